use std::sync::Arc;

use bda_core::model::{
    AnswerMap, Exam, ExamCategory, ExamDifficulty, ExamId, FinishReason, OptionIndex, Role,
    SessionResult,
};
use services::{CompletedExam, ExamMeta};
use storage::fixtures::practice_exam;
use storage::repository::{AttemptRepository, ExamRepository, Storage, StorageError};

use super::test_harness::{HarnessOptions, ViewKind, setup_view_harness, setup_view_harness_with};

async fn settle(harness: &mut super::test_harness::ViewHarness) -> String {
    harness.rebuild();
    for _ in 0..3 {
        harness.drive_async().await;
    }
    harness.render()
}

fn completed(score: u8, correct: u32, reason: FinishReason) -> CompletedExam {
    CompletedExam {
        attempt_id: 7,
        exam: ExamMeta {
            id: ExamId::new(1),
            title: "Fundamentals Practice".into(),
            category: ExamCategory::General,
            difficulty: ExamDifficulty::Medium,
            duration_secs: 3600,
            passing_score: 70,
        },
        questions: Vec::new(),
        result: SessionResult {
            score,
            correct_count: correct,
            total_questions: 50,
            time_spent_secs: 1830,
            answers: AnswerMap::new(),
            reason,
        },
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_shows_role_title_and_exam_entry() {
    let mut harness = setup_view_harness(ViewKind::Dashboard).await;
    let html = settle(&mut harness).await;
    assert!(html.contains("Member Dashboard"), "missing title in {html}");
    assert!(html.contains("Sam Member"), "missing name in {html}");
    assert!(html.contains("Mock Exams"), "missing link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn admin_dashboard_has_no_exam_entry() {
    let options = HarnessOptions {
        role: Role::Admin,
        ..HarnessOptions::default()
    };
    let mut harness = setup_view_harness_with(ViewKind::Dashboard, Storage::in_memory(), options).await;
    let html = settle(&mut harness).await;
    assert!(html.contains("Administration"), "missing title in {html}");
    assert!(!html.contains("Mock Exams"), "unexpected link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn mock_exams_lists_active_exam_card() {
    let mut harness = setup_view_harness(ViewKind::MockExams).await;
    let html = settle(&mut harness).await;
    assert!(
        html.contains("Professional Training Fundamentals"),
        "missing exam title in {html}"
    );
    assert!(html.contains("Questions: 50"), "missing count in {html}");
    assert!(html.contains("Duration: 60 min"), "missing duration in {html}");
    assert!(html.contains("Start Exam"), "missing start button in {html}");
    assert!(!html.contains("badge-pass"), "unexpected badge in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn mock_exams_are_refused_for_other_roles() {
    let options = HarnessOptions {
        role: Role::TrainingPartner,
        ..HarnessOptions::default()
    };
    let mut harness = setup_view_harness_with(ViewKind::MockExams, Storage::in_memory(), options).await;
    let html = settle(&mut harness).await;
    assert!(
        html.contains("available to individual members"),
        "missing role notice in {html}"
    );
    assert!(!html.contains("Start Exam"), "unexpected start button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn take_exam_renders_first_question_and_full_timer() {
    let mut harness = setup_view_harness(ViewKind::TakeExam(1)).await;
    let html = settle(&mut harness).await;
    assert!(html.contains("Question 1 of 50"), "missing progress in {html}");
    assert!(
        html.contains("primary purpose of professional training"),
        "missing prompt in {html}"
    );
    assert!(html.contains("01:00:00"), "missing timer in {html}");
    assert!(!html.contains("low-time"), "unexpected low time in {html}");
    assert!(html.contains("grid-cell current"), "missing grid in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn take_exam_reports_missing_exam() {
    let mut harness = setup_view_harness(ViewKind::TakeExam(42)).await;
    let html = settle(&mut harness).await;
    assert!(
        html.contains("This exam could not be found."),
        "missing error in {html}"
    );
    assert!(html.contains("Back to Mock Exams"), "missing back link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_without_attempt_render_distinctly() {
    let mut harness = setup_view_harness(ViewKind::Results).await;
    let html = settle(&mut harness).await;
    assert!(html.contains("no-attempt"), "missing no-attempt block in {html}");
    assert!(html.contains("No exam attempt to show."), "missing notice in {html}");
    assert!(!html.contains("class=\"score\""), "unexpected score in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_show_score_breakdown_and_verdict() {
    let options = HarnessOptions {
        handoff: Some(completed(80, 40, FinishReason::Submitted)),
        ..HarnessOptions::default()
    };
    let mut harness = setup_view_harness_with(ViewKind::Results, Storage::in_memory(), options).await;
    let html = settle(&mut harness).await;
    assert!(html.contains("80%"), "missing score in {html}");
    assert!(html.contains("PASSED"), "missing verdict in {html}");
    assert!(html.contains("00:30:30"), "missing time spent in {html}");
    assert!(html.contains("Fundamentals Practice"), "missing title in {html}");
    assert!(!html.contains("no-attempt"), "unexpected no-attempt in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn expired_failed_results_carry_notice() {
    let options = HarnessOptions {
        handoff: Some(completed(20, 10, FinishReason::TimeExpired)),
        ..HarnessOptions::default()
    };
    let mut harness = setup_view_harness_with(ViewKind::Results, Storage::in_memory(), options).await;
    let html = settle(&mut harness).await;
    assert!(html.contains("FAILED"), "missing verdict in {html}");
    assert!(html.contains("Time expired."), "missing expiry notice in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_review_shows_answers_keys_and_explanations() {
    let mut handoff = completed(2, 1, FinishReason::Submitted);
    handoff.questions = practice_exam(ExamId::new(1)).unwrap().into_questions();
    handoff.result.answers = [
        (0, OptionIndex::new(1).unwrap()),
        (1, OptionIndex::new(0).unwrap()),
    ]
    .into_iter()
    .collect();
    let options = HarnessOptions {
        handoff: Some(handoff),
        ..HarnessOptions::default()
    };
    let mut harness = setup_view_harness_with(ViewKind::Results, Storage::in_memory(), options).await;
    let html = settle(&mut harness).await;
    assert!(html.contains("Question Review"), "missing review in {html}");
    assert!(html.contains("review-item correct"), "missing correct item in {html}");
    assert!(html.contains("Your answer: A"), "missing chosen answer in {html}");
    assert!(html.contains("Correct answer: C"), "missing key in {html}");
    assert!(
        html.contains("Training builds the skills"),
        "missing explanation in {html}"
    );
    assert!(html.contains("Not answered"), "missing unanswered marker in {html}");
    assert_eq!(html.matches("class=\"review-item").count(), 50);
}

#[tokio::test(flavor = "current_thread")]
async fn results_without_questions_skip_review() {
    let options = HarnessOptions {
        handoff: Some(completed(80, 40, FinishReason::Submitted)),
        ..HarnessOptions::default()
    };
    let mut harness = setup_view_harness_with(ViewKind::Results, Storage::in_memory(), options).await;
    let html = settle(&mut harness).await;
    assert!(!html.contains("Question Review"), "unexpected review in {html}");
    assert!(html.contains("My Attempts"), "missing history link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_history_lists_stored_attempts() {
    let mut harness = setup_view_harness(ViewKind::AttemptHistory(1)).await;
    for _ in 0..2 {
        let mut run = harness.sessions.start_exam(harness.exam_id).await.unwrap();
        let key = run.session().questions()[0].correct_option();
        run.select_answer(0, key).unwrap();
        harness.sessions.submit(&mut run).await.unwrap();
    }

    let html = settle(&mut harness).await;
    assert!(html.contains("My Attempts"), "missing title in {html}");
    assert!(
        html.contains("Professional Training Fundamentals"),
        "missing exam title in {html}"
    );
    assert_eq!(html.matches("attempt failed").count(), 2, "rows in {html}");
    assert!(html.contains("1 / 50"), "missing correct count in {html}");
    assert!(html.contains("Review"), "missing review link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_history_without_attempts_says_so() {
    let mut harness = setup_view_harness(ViewKind::AttemptHistory(1)).await;
    let html = settle(&mut harness).await;
    assert!(
        html.contains("You have not attempted this exam yet."),
        "missing empty notice in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_review_rebuilds_stored_results() {
    let mut harness = setup_view_harness(ViewKind::AttemptReview(1)).await;
    let mut run = harness.sessions.start_exam(harness.exam_id).await.unwrap();
    run.select_answer(4, OptionIndex::new(0).unwrap()).unwrap();
    let completed = harness.sessions.submit(&mut run).await.unwrap();
    assert_eq!(completed.attempt_id, 1);

    let html = settle(&mut harness).await;
    assert!(html.contains("0%"), "missing score in {html}");
    assert!(html.contains("FAILED"), "missing verdict in {html}");
    assert!(html.contains("Question Review"), "missing review in {html}");
    assert!(html.contains("ADDIE stands for"), "missing explanation in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_review_reports_unknown_attempt() {
    let mut harness = setup_view_harness(ViewKind::AttemptReview(9)).await;
    let html = settle(&mut harness).await;
    assert!(html.contains("class=\"error\""), "missing error in {html}");
    assert!(html.contains("Back to Mock Exams"), "missing back link in {html}");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn take_exam_expiry_persists_and_lands_on_results() {
    let options = HarnessOptions {
        exam_duration_secs: Some(2),
        ..HarnessOptions::default()
    };
    let mut harness =
        setup_view_harness_with(ViewKind::TakeExam(1), Storage::in_memory(), options).await;
    let html = settle(&mut harness).await;
    assert!(html.contains("00:00:02"), "missing timer in {html}");

    let mut html = html;
    for _ in 0..200 {
        harness.drive_async().await;
        html = harness.render();
        if html.contains("Exam Complete!") {
            break;
        }
    }
    assert!(html.contains("Exam Complete!"), "never reached results: {html}");
    assert!(html.contains("Time expired."), "missing expiry notice in {html}");

    let rows = harness
        .storage
        .attempts
        .list_attempt_rows(harness.exam_id, 10)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].attempt.reason(), FinishReason::TimeExpired);
    assert_eq!(rows[0].attempt.time_spent_secs(), 2);
}

struct FailingExams;

#[async_trait::async_trait]
impl ExamRepository for FailingExams {
    async fn upsert_exam(&self, _exam: &Exam) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_exam(&self, _id: ExamId) -> Result<Option<Exam>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_exams(&self, _active_only: bool, _limit: u32) -> Result<Vec<Exam>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_failure_offers_retry() {
    let base = Storage::in_memory();
    let storage = Storage {
        exams: Arc::new(FailingExams),
        attempts: base.attempts,
    };
    let options = HarnessOptions {
        seed_exam: false,
        ..HarnessOptions::default()
    };
    let mut harness = setup_view_harness_with(ViewKind::MockExams, storage, options).await;
    let html = settle(&mut harness).await;
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}
