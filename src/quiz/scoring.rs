use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    models::domain::Question,
    quiz::session::{Answer, Phase, QuizSession},
};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question_id: String,
    pub selected: Answer,
    pub correct: usize,
    pub is_correct: bool,
}

/// Immutable outcome of one submitted session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub raw_score: usize,
    pub total_questions: usize,
    pub percentage: u32,
    pub per_question: Vec<QuestionOutcome>,
    pub unanswered_count: usize,
    pub time_taken_seconds: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Scores a submitted session. Returns `None` for a session that has not been
/// submitted yet.
pub fn score(session: &QuizSession) -> Option<QuizResult> {
    if session.phase() != Phase::Submitted {
        return None;
    }
    let started_at = session.started_at()?;
    let ended_at = session.ended_at()?;

    Some(score_responses(
        session.questions(),
        session.responses(),
        started_at,
        ended_at,
    ))
}

/// An unanswered question never matches the correct index, so it counts as
/// incorrect.
pub fn score_responses(
    questions: &[Question],
    responses: &[Answer],
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
) -> QuizResult {
    let per_question: Vec<QuestionOutcome> = questions
        .iter()
        .zip(responses)
        .map(|(question, answer)| QuestionOutcome {
            question_id: question.id.clone(),
            selected: *answer,
            correct: question.correct_option_index,
            is_correct: answer.selected() == Some(question.correct_option_index),
        })
        .collect();

    let raw_score = per_question.iter().filter(|o| o.is_correct).count();
    let unanswered_count = responses.iter().filter(|a| !a.is_answered()).count();
    let total_questions = questions.len();

    QuizResult {
        raw_score,
        total_questions,
        percentage: rounded_percentage(raw_score, total_questions),
        per_question,
        unanswered_count,
        time_taken_seconds: (ended_at - started_at).num_seconds().max(0),
        started_at,
        ended_at,
    }
}

/// `round(part / total * 100)`, rounding halves up, in integer arithmetic.
pub fn rounded_percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part * 200 + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Subject;
    use crate::quiz::session::SessionConfig;
    use chrono::Duration;

    fn submitted(correct: &[usize], picks: &[Option<usize>], seconds: i64) -> QuizSession {
        let started_at = Utc::now();
        let mut session = QuizSession::new(Subject::WebDevelopment, SessionConfig::default());
        session
            .begin(
                correct.iter().map(|c| Question::test_question(*c)).collect(),
                started_at,
            )
            .unwrap();
        for (i, pick) in picks.iter().enumerate() {
            if let Some(option) = pick {
                session.select_option(i, *option).unwrap();
            }
        }
        session.submit_at(started_at + Duration::milliseconds(seconds * 1000 + 999));
        session
    }

    #[test]
    fn two_of_three_rounds_to_sixty_seven() {
        let session = submitted(&[1, 0, 2], &[Some(1), Some(0), Some(1)], 30);
        let result = score(&session).unwrap();

        assert_eq!(result.raw_score, 2);
        assert_eq!(result.percentage, 67);
        assert_eq!(result.unanswered_count, 0);
        assert_eq!(
            result.per_question.iter().map(|o| o.is_correct).collect::<Vec<_>>(),
            vec![true, true, false]
        );
    }

    #[test]
    fn never_answered_scores_zero() {
        let session = submitted(&[0, 1, 2, 3], &[None, None, None, None], 5);
        let result = score(&session).unwrap();

        assert_eq!(result.raw_score, 0);
        assert_eq!(result.percentage, 0);
        assert_eq!(result.unanswered_count, 4);
        assert!(result.per_question.iter().all(|o| o.selected == Answer::Unanswered));
    }

    #[test]
    fn time_taken_is_floored_to_whole_seconds() {
        let session = submitted(&[1], &[Some(1)], 42);
        let result = score(&session).unwrap();

        assert_eq!(result.time_taken_seconds, 42);
    }

    #[test]
    fn scoring_is_deterministic() {
        let session = submitted(&[1, 0, 2], &[Some(1), None, Some(2)], 12);

        assert_eq!(score(&session), score(&session));
    }

    #[test]
    fn unsubmitted_session_has_no_result() {
        let mut session = QuizSession::new(Subject::DataScience, SessionConfig::default());
        assert!(score(&session).is_none());

        session
            .begin(vec![Question::test_question(0)], Utc::now())
            .unwrap();
        assert!(score(&session).is_none());
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(5, 5), 100);
        assert_eq!(rounded_percentage(0, 0), 0);
    }
}
