use std::fmt::Write;

use serde::Serialize;

use crate::{
    constants::{grading::is_passing, PASS_THRESHOLD_PERCENT},
    models::domain::{Question, Subject},
    quiz::{error::QuizError, scoring::QuizResult},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub question: String,
    pub selected_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Confirmation shown once a session is submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub title: String,
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub passed: bool,
    pub unanswered: usize,
    pub time_taken: String,
    pub questions: Vec<QuestionReview>,
}

impl ResultView {
    pub fn new(subject: Subject, questions: &[Question], result: &QuizResult) -> Self {
        let reviews = questions
            .iter()
            .zip(&result.per_question)
            .map(|(question, outcome)| QuestionReview {
                question: question.text.clone(),
                selected_answer: outcome
                    .selected
                    .selected()
                    .and_then(|i| question.options.get(i).cloned()),
                correct_answer: question
                    .options
                    .get(outcome.correct)
                    .cloned()
                    .unwrap_or_default(),
                is_correct: outcome.is_correct,
            })
            .collect();

        Self {
            title: format!("{} Certification", subject.title()),
            score: result.raw_score,
            total: result.total_questions,
            percentage: result.percentage,
            passed: is_passing(result.percentage as i32),
            unanswered: result.unanswered_count,
            time_taken: format_time_taken(result.time_taken_seconds),
            questions: reviews,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let verdict = if self.passed { "PASSED" } else { "NOT PASSED" };

        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(
            out,
            "Score: {}/{} ({}%) - {} (pass mark {}%)",
            self.score, self.total, self.percentage, verdict, PASS_THRESHOLD_PERCENT
        );
        let _ = writeln!(out, "Unanswered: {}", self.unanswered);
        let _ = writeln!(out, "Time taken: {}", self.time_taken);

        for (i, review) in self.questions.iter().enumerate() {
            let mark = if review.is_correct { "✓" } else { "✗" };
            let _ = writeln!(out, "{} {}. {}", mark, i + 1, review.question);
            let _ = writeln!(
                out,
                "    your answer: {}",
                review.selected_answer.as_deref().unwrap_or("(not answered)")
            );
            if !review.is_correct {
                let _ = writeln!(out, "    correct answer: {}", review.correct_answer);
            }
        }
        out
    }
}

/// Countdown display, `mm:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn format_time_taken(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}m {}s", seconds / 60, seconds % 60)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerUrgency {
    Normal,
    Warning,
    Critical,
}

pub fn timer_urgency(remaining_seconds: u32) -> TimerUrgency {
    match remaining_seconds {
        s if s < 60 => TimerUrgency::Critical,
        s if s < 300 => TimerUrgency::Warning,
        _ => TimerUrgency::Normal,
    }
}

/// Message for the two load-time failures. Diagnostic detail is only included
/// in debug builds.
pub fn load_error_message(err: &QuizError) -> String {
    match err {
        QuizError::NoQuestionsAvailable(_) => {
            "No questions available for this subject. Please try another subject.".to_string()
        }
        QuizError::LoadFailure(detail) if cfg!(debug_assertions) => {
            format!("Failed to load questions: {}. Please try again later.", detail)
        }
        QuizError::LoadFailure(_) => {
            "Failed to load questions. Please try again later.".to_string()
        }
        other => other.to_string(),
    }
}
