use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::question::OptionIndex;

/// Whether a question in the current session has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Answered,
    Unanswered,
}

/// Chosen option per question index. Last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<usize, OptionIndex>);

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `option` for `question_index`, returning the replaced answer if any.
    pub fn select(&mut self, question_index: usize, option: OptionIndex) -> Option<OptionIndex> {
        self.0.insert(question_index, option)
    }

    pub fn clear(&mut self, question_index: usize) -> Option<OptionIndex> {
        self.0.remove(&question_index)
    }

    #[must_use]
    pub fn get(&self, question_index: usize) -> Option<OptionIndex> {
        self.0.get(&question_index).copied()
    }

    #[must_use]
    pub fn contains(&self, question_index: usize) -> bool {
        self.0.contains_key(&question_index)
    }

    #[must_use]
    pub fn status(&self, question_index: usize) -> QuestionStatus {
        if self.contains(question_index) {
            QuestionStatus::Answered
        } else {
            QuestionStatus::Unanswered
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending question order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, OptionIndex)> + '_ {
        self.0.iter().map(|(index, option)| (*index, *option))
    }
}

impl FromIterator<(usize, OptionIndex)> for AnswerMap {
    fn from_iter<T: IntoIterator<Item = (usize, OptionIndex)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (index, option) in iter {
            map.select(index, option);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(i: usize) -> OptionIndex {
        OptionIndex::new(i).unwrap()
    }

    #[test]
    fn last_write_wins_per_index() {
        let mut map = AnswerMap::new();
        assert_eq!(map.select(0, opt(1)), None);
        assert_eq!(map.select(3, opt(2)), None);
        assert_eq!(map.select(0, opt(3)), Some(opt(1)));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(0), Some(opt(3)));
        assert_eq!(map.status(3), QuestionStatus::Answered);
        assert_eq!(map.status(1), QuestionStatus::Unanswered);
    }

    #[test]
    fn serializes_as_index_keyed_object() {
        let map: AnswerMap = [(2, opt(1)), (0, opt(3))].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"0":3,"2":1}"#);

        let back: AnswerMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
