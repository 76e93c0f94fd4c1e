//! Built-in practice exam used by the seed binary and first-launch provisioning.

use bda_core::model::{
    Exam, ExamCategory, ExamDifficulty, ExamId, OptionIndex, Question, QuestionId,
};

/// Title of the built-in practice exam.
pub const PRACTICE_EXAM_TITLE: &str = "Professional Training Fundamentals - Practice Test";

/// Time budget of the built-in practice exam (one hour).
pub const PRACTICE_EXAM_DURATION_SECS: u32 = 3600;

/// Total number of questions in the built-in practice exam.
pub const PRACTICE_EXAM_QUESTIONS: usize = 50;

const AUTHORED: [(&str, [&str; 4], usize, &str); 5] = [
    (
        "What is the primary purpose of professional training in the workplace?",
        [
            "To increase employee satisfaction only",
            "To develop skills, knowledge, and competencies for improved performance",
            "To reduce operational costs",
            "To comply with government regulations only",
        ],
        1,
        "Training builds the skills, knowledge and competencies people need to perform better in their roles.",
    ),
    (
        "Which of the following is NOT a characteristic of effective training?",
        [
            "Clear learning objectives",
            "Interactive and engaging content",
            "One-size-fits-all approach",
            "Regular assessment and feedback",
        ],
        2,
        "Effective training adapts to the audience; a one-size-fits-all approach ignores different needs and starting points.",
    ),
    (
        "What is the difference between training and development?",
        [
            "Training is for managers, development is for employees",
            "Training focuses on current job skills, development focuses on future growth",
            "Training is expensive, development is cost-effective",
            "There is no difference between training and development",
        ],
        1,
        "Training targets the skills needed for the current job, while development prepares people for future roles.",
    ),
    (
        "Which training method is most suitable for teaching complex procedures?",
        [
            "Lecture-based training only",
            "Reading materials only",
            "Hands-on practical training with supervision",
            "Online videos without interaction",
        ],
        2,
        "Complex procedures are learned best by doing them under supervision, with feedback on each step.",
    ),
    (
        "What is the ADDIE model in training design?",
        [
            "A certification program",
            "A systematic approach: Analyze, Design, Develop, Implement, Evaluate",
            "A type of learning management system",
            "A government training standard",
        ],
        1,
        "ADDIE stands for Analyze, Design, Develop, Implement and Evaluate, a systematic instructional design process.",
    ),
];

/// Builds the 50-question practice exam: five authored questions followed by
/// generated scenario questions with a deterministic answer key.
///
/// # Errors
///
/// Returns `bda_core::Error` if any built-in question fails validation.
pub fn practice_exam(id: ExamId) -> Result<Exam, bda_core::Error> {
    let mut questions = Vec::with_capacity(PRACTICE_EXAM_QUESTIONS);

    for (offset, (prompt, options, correct, explanation)) in AUTHORED.iter().enumerate() {
        questions.push(
            Question::new(
                QuestionId::new(offset as u64 + 1),
                *prompt,
                options.map(str::to_owned),
                OptionIndex::new(*correct)?,
            )?
            .with_explanation(Some((*explanation).to_owned())),
        );
    }

    for number in (AUTHORED.len() + 1)..=PRACTICE_EXAM_QUESTIONS {
        let prompt = format!(
            "Sample question {number}: This is a practice question to demonstrate the exam \
             interface. What would be the best approach to handle this scenario?"
        );
        let options = ["A", "B", "C", "D"].map(|letter| format!("Option {letter} for question {number}"));
        questions.push(Question::new(
            QuestionId::new(number as u64),
            prompt,
            options,
            OptionIndex::new((number * 7) % 4)?,
        )?);
    }

    let exam = Exam::new(
        id,
        PRACTICE_EXAM_TITLE,
        ExamCategory::General,
        ExamDifficulty::Medium,
        PRACTICE_EXAM_DURATION_SECS,
        questions,
    )?
    .with_description(Some(
        "Single-choice practice test covering training fundamentals.".to_owned(),
    ));

    Ok(exam)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn practice_exam_has_fifty_questions_and_one_hour() {
        let exam = practice_exam(ExamId::new(1)).unwrap();
        assert_eq!(exam.question_count(), PRACTICE_EXAM_QUESTIONS);
        assert_eq!(exam.duration_secs(), 3600);
        assert_eq!(exam.questions()[1].correct_option().get(), 2);
        assert_eq!(exam.questions()[49].id(), QuestionId::new(50));
        assert!(exam.questions()[4].explanation().is_some_and(|e| e.contains("ADDIE")));
        assert_eq!(exam.questions()[5].explanation(), None);
    }
}
