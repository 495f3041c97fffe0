use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_EXAM_DURATION_SECS, DEFAULT_QUESTIONS_PER_EXAM},
    models::domain::{Question, Subject},
    quiz::{
        error::QuizError,
        scoring::{rounded_percentage, score, QuizResult},
        store::QuestionStore,
    },
};

/// A candidate's response to one question.
///
/// Serialized as `null` or the selected option index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "Option<usize>", into = "Option<usize>")]
pub enum Answer {
    #[default]
    Unanswered,
    Selected(usize),
}

impl Answer {
    pub fn selected(&self) -> Option<usize> {
        match self {
            Answer::Unanswered => None,
            Answer::Selected(option) => Some(*option),
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Answer::Selected(_))
    }
}

impl From<Option<usize>> for Answer {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Answer::Unanswered, Answer::Selected)
    }
}

impl From<Answer> for Option<usize> {
    fn from(answer: Answer) -> Self {
        answer.selected()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Loading,
    InProgress,
    Reviewing,
    Submitted,
    Errored,
}

impl Phase {
    /// Phases in which the countdown runs and answers can change.
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::InProgress | Phase::Reviewing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Loading => "loading",
            Phase::InProgress => "in progress",
            Phase::Reviewing => "reviewing",
            Phase::Submitted => "submitted",
            Phase::Errored => "errored",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub duration_seconds: u32,
    pub question_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_seconds: DEFAULT_EXAM_DURATION_SECS,
            question_limit: DEFAULT_QUESTIONS_PER_EXAM,
        }
    }
}

/// Answered/unanswered/flagged tallies shown beside the question navigator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub unanswered: usize,
    pub flagged: usize,
    pub completion_percent: u32,
}

/// One candidate's in-progress exam for one subject.
///
/// `responses` and `flags` always have the same length as `questions`. The
/// session holds no timer of its own; whoever owns it calls [`QuizSession::tick`]
/// once per second while [`Phase::is_active`].
#[derive(Debug, Clone)]
pub struct QuizSession {
    subject: Subject,
    config: SessionConfig,
    questions: Vec<Question>,
    responses: Vec<Answer>,
    flags: Vec<bool>,
    current_index: usize,
    remaining_seconds: u32,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    phase: Phase,
}

impl QuizSession {
    pub fn new(subject: Subject, config: SessionConfig) -> Self {
        Self {
            subject,
            config,
            questions: Vec::new(),
            responses: Vec::new(),
            flags: Vec::new(),
            current_index: 0,
            remaining_seconds: config.duration_seconds,
            started_at: None,
            ended_at: None,
            phase: Phase::Loading,
        }
    }

    /// Fetches the question set once and starts the exam.
    ///
    /// Both failures are terminal: the session moves to [`Phase::Errored`] and a
    /// new session has to be created.
    pub async fn start(&mut self, store: &dyn QuestionStore) -> Result<(), QuizError> {
        self.require_phase("start", Phase::Loading)?;

        log::info!("Fetching questions for subject: {}", self.subject);
        match store
            .fetch_questions(self.subject, self.config.question_limit)
            .await
        {
            Ok(questions) => self.begin(questions, Utc::now()),
            Err(err) => {
                log::warn!("Failed to load questions for {}: {}", self.subject, err);
                self.phase = Phase::Errored;
                Err(QuizError::LoadFailure(err.to_string()))
            }
        }
    }

    /// Installs an already fetched question set and moves to [`Phase::InProgress`].
    pub fn begin(
        &mut self,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<(), QuizError> {
        self.require_phase("begin", Phase::Loading)?;

        if questions.is_empty() {
            self.phase = Phase::Errored;
            return Err(QuizError::NoQuestionsAvailable(self.subject));
        }

        if let Some((position, err)) = questions
            .iter()
            .enumerate()
            .find_map(|(i, q)| q.check_shape().err().map(|e| (i, e)))
        {
            self.phase = Phase::Errored;
            return Err(QuizError::LoadFailure(format!(
                "question {} ({}) is malformed: {}",
                position + 1,
                questions[position].id,
                err
            )));
        }

        log::info!("Received {} questions for {}", questions.len(), self.subject);

        self.responses = vec![Answer::Unanswered; questions.len()];
        self.flags = vec![false; questions.len()];
        self.questions = questions;
        self.current_index = 0;
        self.started_at = Some(started_at);
        self.phase = Phase::InProgress;
        Ok(())
    }

    /// Records `option` as the answer to question `index`. Last write wins and
    /// the current pointer does not move.
    pub fn select_option(&mut self, index: usize, option: usize) -> Result<(), QuizError> {
        self.require_active("select_option")?;
        let question = self.question_at(index)?;

        if option >= question.options.len() {
            return Err(QuizError::OptionOutOfRange {
                question: index,
                option,
                len: question.options.len(),
            });
        }

        self.responses[index] = Answer::Selected(option);
        Ok(())
    }

    /// Inverts the review flag on question `index` and returns the new value.
    pub fn toggle_flag(&mut self, index: usize) -> Result<bool, QuizError> {
        self.require_active("toggle_flag")?;
        self.question_at(index)?;

        self.flags[index] = !self.flags[index];
        Ok(self.flags[index])
    }

    /// Moves the pointer to `index`, clamped to the last question.
    pub fn go_to(&mut self, index: usize) -> usize {
        if self.phase.is_active() {
            self.current_index = index.min(self.questions.len().saturating_sub(1));
        }
        self.current_index
    }

    pub fn next(&mut self) -> usize {
        if self.phase.is_active() && self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        }
        self.current_index
    }

    pub fn previous(&mut self) -> usize {
        if self.phase.is_active() && self.current_index > 0 {
            self.current_index -= 1;
        }
        self.current_index
    }

    pub fn enter_review(&mut self) -> Result<(), QuizError> {
        self.require_phase("enter_review", Phase::InProgress)?;
        self.phase = Phase::Reviewing;
        Ok(())
    }

    pub fn exit_review(&mut self) -> Result<(), QuizError> {
        self.require_phase("exit_review", Phase::Reviewing)?;
        self.phase = Phase::InProgress;
        Ok(())
    }

    /// Counts down one second. Reaching zero submits the session before
    /// returning, and the returned result is that submission's.
    pub fn tick(&mut self) -> Option<QuizResult> {
        if !self.phase.is_active() {
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            log::info!("Time is up for {}, submitting", self.subject);
            return self.submit();
        }
        None
    }

    pub fn submit(&mut self) -> Option<QuizResult> {
        self.submit_at(Utc::now())
    }

    /// Freezes the session and scores it. Only the first call from an active
    /// phase has an effect; every later call returns `None`.
    pub fn submit_at(&mut self, ended_at: DateTime<Utc>) -> Option<QuizResult> {
        if !self.phase.is_active() {
            return None;
        }

        self.phase = Phase::Submitted;
        self.ended_at = Some(ended_at);
        score(self)
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn responses(&self) -> &[Answer] {
        &self.responses
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn progress(&self) -> Progress {
        let answered = self.responses.iter().filter(|a| a.is_answered()).count();
        let total = self.questions.len();

        Progress {
            answered,
            unanswered: total - answered,
            flagged: self.flags.iter().filter(|f| **f).count(),
            completion_percent: rounded_percentage(answered, total),
        }
    }

    fn question_at(&self, index: usize) -> Result<&Question, QuizError> {
        self.questions
            .get(index)
            .ok_or(QuizError::QuestionOutOfRange {
                index,
                len: self.questions.len(),
            })
    }

    fn require_active(&self, operation: &'static str) -> Result<(), QuizError> {
        if self.phase.is_active() {
            Ok(())
        } else {
            Err(QuizError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    fn require_phase(&self, operation: &'static str, expected: Phase) -> Result<(), QuizError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(QuizError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }
}
