use std::time::Duration;

use serde::Serialize;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use crate::quiz::{
    error::QuizError,
    presentation::ResultView,
    scoring::QuizResult,
    session::{Answer, Phase, Progress, QuizSession},
    submission::SubmissionProtocol,
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Candidate actions forwarded to a running exam.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExamCommand {
    SelectOption { question: usize, option: usize },
    ToggleFlag(usize),
    GoTo(usize),
    Next,
    Previous,
    EnterReview,
    ExitReview,
    Submit,
    Snapshot,
}

/// View of the session after a command was applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSnapshot {
    pub phase: Phase,
    pub current_index: usize,
    pub remaining_seconds: u32,
    pub responses: Vec<Answer>,
    pub flags: Vec<bool>,
    pub progress: Progress,
}

impl ExamSnapshot {
    fn of(session: &QuizSession) -> Self {
        Self {
            phase: session.phase(),
            current_index: session.current_index(),
            remaining_seconds: session.remaining_seconds(),
            responses: session.responses().to_vec(),
            flags: session.flags().to_vec(),
            progress: session.progress(),
        }
    }
}

/// Delivered once, when the session is submitted by the candidate or by the
/// countdown.
#[derive(Debug)]
pub struct ExamOutcome {
    pub result: QuizResult,
    pub view: ResultView,
    /// Background persistence of the attempt. Dropping it does not cancel it.
    pub persistence: JoinHandle<()>,
}

struct ExamRequest {
    command: ExamCommand,
    reply: oneshot::Sender<Result<ExamSnapshot, QuizError>>,
}

/// Runs a started [`QuizSession`] on its own task.
///
/// The task is the session's only owner, so candidate commands and countdown
/// ticks are applied one at a time. The countdown lives inside the task and is
/// released with it on every exit path: submission, timeout, or the handle
/// being cancelled or dropped.
pub struct ExamDriver;

impl ExamDriver {
    pub fn launch(
        session: QuizSession,
        submission: SubmissionProtocol,
    ) -> Result<ExamHandle, QuizError> {
        if !session.phase().is_active() {
            return Err(QuizError::InvalidPhase {
                operation: "launch",
                phase: session.phase(),
            });
        }

        let (commands, requests) = mpsc::channel(32);
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let task = tokio::spawn(run_exam(session, submission, requests, outcome_tx));

        Ok(ExamHandle {
            commands,
            outcome: Some(outcome_rx),
            task,
        })
    }
}

pub struct ExamHandle {
    commands: mpsc::Sender<ExamRequest>,
    outcome: Option<oneshot::Receiver<ExamOutcome>>,
    task: JoinHandle<()>,
}

impl ExamHandle {
    pub async fn send(&self, command: ExamCommand) -> Result<ExamSnapshot, QuizError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(ExamRequest { command, reply })
            .await
            .map_err(|_| QuizError::SessionClosed)?;
        response.await.map_err(|_| QuizError::SessionClosed)?
    }

    pub async fn snapshot(&self) -> Result<ExamSnapshot, QuizError> {
        self.send(ExamCommand::Snapshot).await
    }

    /// Waits for the exam to be submitted. Returns `None` if it was already
    /// taken or the exam was torn down first.
    pub async fn finished(&mut self) -> Option<ExamOutcome> {
        self.outcome.take()?.await.ok()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Abandons the exam. Nothing is scored or persisted.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ExamHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_exam(
    mut session: QuizSession,
    submission: SubmissionProtocol,
    mut requests: mpsc::Receiver<ExamRequest>,
    outcome: oneshot::Sender<ExamOutcome>,
) {
    let mut countdown = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let result = loop {
        tokio::select! {
            _ = countdown.tick() => {
                if let Some(result) = session.tick() {
                    break result;
                }
            }
            request = requests.recv() => {
                let Some(ExamRequest { command, reply }) = request else {
                    log::info!("Exam for {} abandoned before submission", session.subject());
                    return;
                };

                let (response, submitted) = apply(&mut session, command);
                let _ = reply.send(response);
                if let Some(result) = submitted {
                    break result;
                }
            }
        }
    };

    let test_id = session.subject().as_str();
    let view = ResultView::new(session.subject(), session.questions(), &result);
    let persistence = submission.persist_in_background(test_id, &result);

    log::info!(
        "Exam for {} submitted: {}/{} ({}%)",
        test_id,
        result.raw_score,
        result.total_questions,
        result.percentage
    );

    let _ = outcome.send(ExamOutcome {
        result,
        view,
        persistence,
    });
}

fn apply(
    session: &mut QuizSession,
    command: ExamCommand,
) -> (Result<ExamSnapshot, QuizError>, Option<QuizResult>) {
    let mut submitted = None;
    let applied = match command {
        ExamCommand::SelectOption { question, option } => session.select_option(question, option),
        ExamCommand::ToggleFlag(question) => session.toggle_flag(question).map(|_| ()),
        ExamCommand::GoTo(question) => {
            session.go_to(question);
            Ok(())
        }
        ExamCommand::Next => {
            session.next();
            Ok(())
        }
        ExamCommand::Previous => {
            session.previous();
            Ok(())
        }
        ExamCommand::EnterReview => session.enter_review(),
        ExamCommand::ExitReview => session.exit_review(),
        ExamCommand::Submit => {
            submitted = session.submit();
            Ok(())
        }
        ExamCommand::Snapshot => Ok(()),
    };

    (applied.map(|_| ExamSnapshot::of(session)), submitted)
}
