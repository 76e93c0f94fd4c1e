use bda_core::model::{
    AnswerMap, AttemptRecord, Exam, ExamId, FinishReason, OptionIndex, SessionResult,
    score_percent,
};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use storage::fixtures::practice_exam;
use storage::repository::Storage;

/// Seed a `SQLite` database with the practice exam and a few past attempts.
#[derive(Debug, Clone, Parser)]
#[command(name = "seed", version)]
struct Args {
    /// `SQLite` URL.
    #[arg(long = "db", env = "BDA_DB_URL", default_value = "sqlite:dev.sqlite3")]
    db_url: String,

    /// Exam id to upsert.
    #[arg(long, env = "BDA_EXAM_ID", default_value_t = 1)]
    exam_id: u64,

    /// Number of past attempts to append.
    #[arg(long, env = "BDA_SEED_ATTEMPTS", default_value_t = 3)]
    attempts: u32,

    /// Fixed current time (RFC3339) for deterministic seeding.
    #[arg(long, value_parser = parse_rfc3339)]
    now: Option<DateTime<Utc>>,
}

fn parse_rfc3339(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("expected RFC3339, got {raw}"))
}

/// Answers the first `correct` questions with the key and the rest with a
/// wrong option, so the stored answer map matches the stored score.
fn sample_result(
    exam: &Exam,
    correct: u32,
    time_spent_secs: u32,
) -> SessionResult {
    let answers: AnswerMap = exam
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let key = question.correct_option();
            if index < correct as usize {
                (index, key)
            } else {
                let wrong = OptionIndex::all()
                    .find(|opt| *opt != key)
                    .unwrap_or(key);
                (index, wrong)
            }
        })
        .collect();
    let total = u32::try_from(exam.question_count()).unwrap_or(u32::MAX);
    SessionResult {
        score: score_percent(correct, total),
        correct_count: correct,
        total_questions: total,
        time_spent_secs,
        answers,
        reason: FinishReason::Submitted,
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    let exam = practice_exam(ExamId::new(args.exam_id))?;
    storage.exams.upsert_exam(&exam).await?;

    let total = u32::try_from(exam.question_count()).unwrap_or(u32::MAX);
    for i in 0..args.attempts {
        let completed_at = now - Duration::days(i64::from(i) * 2);
        let time_spent_secs = 1800 + i * 120;
        let started_at = completed_at - Duration::seconds(i64::from(time_spent_secs));
        let correct = total.saturating_sub(5 + i * 8);

        let record = AttemptRecord::from_result(
            exam.id(),
            started_at,
            completed_at,
            exam.passing_score(),
            sample_result(&exam, correct, time_spent_secs),
        )?;
        let _ = storage.attempts.append_attempt(&record).await?;
    }

    println!(
        "Seeded exam {} ({} questions) with {} attempts into {}",
        exam.id(),
        exam.question_count(),
        args.attempts,
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
