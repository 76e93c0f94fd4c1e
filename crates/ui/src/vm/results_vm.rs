use bda_core::model::{
    AnswerMap, DEFAULT_PASSING_SCORE, ExamOutcome, FinishReason, OptionIndex, Performance,
    Question,
};

use super::time_fmt::format_hms;
use crate::context::ExamHandoff;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewOptionVm {
    pub letter: char,
    pub text: String,
    pub is_key: bool,
    pub chosen: bool,
}

/// One question as reviewed after the attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewItemVm {
    pub number: usize,
    pub prompt: String,
    pub options: Vec<ReviewOptionVm>,
    pub chosen: Option<char>,
    pub correct_letter: char,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

impl ReviewItemVm {
    fn new(index: usize, question: &Question, answers: &AnswerMap) -> Self {
        let chosen = answers.get(index);
        let key = question.correct_option();
        Self {
            number: index + 1,
            prompt: question.prompt().to_owned(),
            options: OptionIndex::all()
                .map(|option| ReviewOptionVm {
                    letter: option.letter(),
                    text: question.option(option).to_owned(),
                    is_key: option == key,
                    chosen: chosen == Some(option),
                })
                .collect(),
            chosen: chosen.map(OptionIndex::letter),
            correct_letter: key.letter(),
            is_correct: chosen.is_some_and(|option| question.is_correct(option)),
            explanation: question.explanation().map(str::to_owned),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedResultsVm {
    pub title: String,
    pub score: u8,
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    pub total: u32,
    pub time_spent_str: String,
    pub passing_score: u8,
    pub passed: bool,
    pub expired: bool,
    pub performance_key: &'static str,
    pub review: Vec<ReviewItemVm>,
}

/// What the results screen shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultsVm {
    NoAttempt,
    Completed(CompletedResultsVm),
}

impl ResultsVm {
    #[must_use]
    pub fn from_handoff(handoff: &ExamHandoff) -> Self {
        let ExamOutcome::Completed(result) = &handoff.outcome else {
            return ResultsVm::NoAttempt;
        };

        let (title, passing_score) = handoff.exam.as_ref().map_or_else(
            || (String::new(), DEFAULT_PASSING_SCORE),
            |exam| (exam.title.clone(), exam.passing_score),
        );
        let answered = u32::try_from(result.answered_count()).unwrap_or(u32::MAX);
        let performance = result.performance();

        ResultsVm::Completed(CompletedResultsVm {
            title,
            score: result.score,
            correct: result.correct_count,
            incorrect: answered.saturating_sub(result.correct_count),
            unanswered: result.total_questions.saturating_sub(answered),
            total: result.total_questions,
            time_spent_str: format_hms(result.time_spent_secs),
            passing_score,
            passed: result.passed(passing_score),
            expired: result.reason == FinishReason::TimeExpired,
            performance_key: performance_key(performance),
            review: handoff
                .questions
                .iter()
                .enumerate()
                .map(|(index, question)| ReviewItemVm::new(index, question, &result.answers))
                .collect(),
        })
    }
}

fn performance_key(performance: Performance) -> &'static str {
    match performance {
        Performance::Excellent => "results.performance.excellent",
        Performance::Good => "results.performance.good",
        Performance::Pass => "results.performance.pass",
        Performance::Fail => "results.performance.fail",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bda_core::model::{ExamCategory, ExamDifficulty, ExamId, QuestionId, SessionResult};
    use services::ExamMeta;

    fn handoff(score: u8, correct: u32, answered: usize, passing_score: u8) -> ExamHandoff {
        let answers: AnswerMap = (0..answered)
            .map(|i| (i, OptionIndex::new(0).unwrap()))
            .collect();
        ExamHandoff {
            exam: Some(ExamMeta {
                id: ExamId::new(1),
                title: "Practice".into(),
                category: ExamCategory::General,
                difficulty: ExamDifficulty::Medium,
                duration_secs: 3600,
                passing_score,
            }),
            questions: Vec::new(),
            outcome: ExamOutcome::Completed(SessionResult {
                score,
                correct_count: correct,
                total_questions: 5,
                time_spent_secs: 600,
                answers,
                reason: FinishReason::Submitted,
            }),
        }
    }

    #[test]
    fn empty_handoff_is_no_attempt() {
        assert_eq!(
            ResultsVm::from_handoff(&ExamHandoff::default()),
            ResultsVm::NoAttempt
        );
    }

    #[test]
    fn completed_breaks_down_answers_and_time() {
        let ResultsVm::Completed(vm) = ResultsVm::from_handoff(&handoff(60, 3, 4, 70)) else {
            panic!("expected completed results");
        };
        assert_eq!(vm.correct, 3);
        assert_eq!(vm.incorrect, 1);
        assert_eq!(vm.unanswered, 1);
        assert_eq!(vm.time_spent_str, "00:10:00");
        assert!(!vm.passed);
        assert!(!vm.expired);
        assert_eq!(vm.performance_key, "results.performance.fail");
    }

    #[test]
    fn pass_uses_the_exam_threshold() {
        let ResultsVm::Completed(vm) = ResultsVm::from_handoff(&handoff(60, 3, 3, 60)) else {
            panic!("expected completed results");
        };
        assert!(vm.passed);
        assert_eq!(vm.passing_score, 60);
    }

    fn question(id: u64, key: usize, explanation: Option<&str>) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Prompt {id}"),
            ["w", "x", "y", "z"].map(str::to_owned),
            OptionIndex::new(key).unwrap(),
        )
        .unwrap()
        .with_explanation(explanation.map(str::to_owned))
    }

    #[test]
    fn review_follows_presented_order_and_answers() {
        let mut handoff = handoff(40, 1, 2, 70);
        // Answers: index 0 and 1 both chose A.
        handoff.questions = vec![
            question(9, 0, Some("A is the key.")),
            question(4, 2, None),
            question(7, 3, None),
        ];
        let ResultsVm::Completed(vm) = ResultsVm::from_handoff(&handoff) else {
            panic!("expected completed results");
        };

        assert_eq!(vm.review.len(), 3);
        let first = &vm.review[0];
        assert_eq!(first.number, 1);
        assert_eq!(first.prompt, "Prompt 9");
        assert!(first.is_correct);
        assert_eq!(first.chosen, Some('A'));
        assert_eq!(first.explanation.as_deref(), Some("A is the key."));

        let second = &vm.review[1];
        assert!(!second.is_correct);
        assert_eq!(second.correct_letter, 'C');
        assert!(second.options[0].chosen && !second.options[0].is_key);
        assert!(second.options[2].is_key && !second.options[2].chosen);

        let third = &vm.review[2];
        assert_eq!(third.chosen, None);
        assert!(!third.is_correct);
        assert!(third.explanation.is_none());
    }
}
