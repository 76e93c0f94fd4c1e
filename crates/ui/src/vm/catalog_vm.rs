use bda_core::model::Exam;
use services::ExamStats;

use super::time_fmt::format_date;

/// One card on the mock exam list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamCardVm {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub category: &'static str,
    pub difficulty: &'static str,
    pub question_count: usize,
    pub duration_minutes: u32,
    pub attempt_count: u32,
    pub best_score: Option<u8>,
    pub has_passed: bool,
    pub last_attempt: Option<String>,
}

#[must_use]
pub fn map_exam_card(exam: &Exam, stats: &ExamStats) -> ExamCardVm {
    ExamCardVm {
        id: exam.id().value(),
        title: exam.title().to_owned(),
        description: exam.description().map(ToOwned::to_owned),
        category: exam.category().as_str(),
        difficulty: exam.difficulty().as_str(),
        question_count: exam.question_count(),
        duration_minutes: exam.duration_secs().div_ceil(60),
        attempt_count: stats.attempt_count,
        best_score: stats.best_score,
        has_passed: stats.has_passed,
        last_attempt: stats.last_attempt_at.map(format_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bda_core::model::ExamId;
    use bda_core::time::fixed_now;
    use storage::fixtures::practice_exam;

    #[test]
    fn card_without_attempts_has_no_score_or_date() {
        let exam = practice_exam(ExamId::new(3)).unwrap();
        let card = map_exam_card(&exam, &ExamStats::default());
        assert_eq!(card.id, 3);
        assert_eq!(card.question_count, 50);
        assert_eq!(card.duration_minutes, 60);
        assert_eq!(card.best_score, None);
        assert_eq!(card.last_attempt, None);
        assert!(!card.has_passed);
    }

    #[test]
    fn card_carries_best_score_and_last_attempt_date() {
        let exam = practice_exam(ExamId::new(1)).unwrap();
        let stats = ExamStats {
            attempt_count: 2,
            best_score: Some(84),
            average_score: Some(77),
            last_attempt_at: Some(fixed_now()),
            has_passed: true,
        };
        let card = map_exam_card(&exam, &stats);
        assert_eq!(card.best_score, Some(84));
        assert_eq!(card.last_attempt.as_deref(), Some("2023-11-14"));
        assert!(card.has_passed);
    }
}
