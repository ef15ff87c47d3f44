use quiz_core::model::{ResultId, Tally};
use services::{AuthenticatedUser, QuizSession, SessionLoopService, SessionProgress};

use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayIntent {
    Submit(String),
    RetrySave,
    PlayAgain,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    Continue,
    Completed { result_id: Option<ResultId> },
}

/// What the player sees after submitting an answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub expected: String,
}

impl AnswerFeedback {
    #[must_use]
    pub fn message(&self) -> String {
        if self.is_correct {
            "Correct!".to_string()
        } else {
            format!("Wrong. The answer was {}.", self.expected)
        }
    }
}

pub struct PlayVm {
    session: QuizSession,
    feedback: Option<AnswerFeedback>,
}

impl PlayVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            feedback: None,
        }
    }

    #[must_use]
    pub fn prompt_text(&self) -> Option<&str> {
        self.session.current_question().ok().map(|q| q.prompt())
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.session.progress()
    }

    /// "Question n of m" while playing.
    #[must_use]
    pub fn progress_label(&self) -> Option<String> {
        let progress = self.progress();
        progress
            .current_number()
            .map(|n| format!("Question {n} of {}", progress.total))
    }

    #[must_use]
    pub fn tally(&self) -> Tally {
        self.session.tally()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    #[must_use]
    pub fn result_id(&self) -> Option<ResultId> {
        self.session.result_id()
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the answer cannot be graded or the
    /// final result cannot be saved.
    pub async fn submit(
        &mut self,
        session_loop: &SessionLoopService,
        answer: &str,
    ) -> Result<PlayOutcome, ViewError> {
        let result = session_loop
            .submit(&mut self.session, answer)
            .await
            .map_err(|_| ViewError::Unknown)?;

        self.feedback = Some(AnswerFeedback {
            is_correct: result.outcome.is_correct,
            expected: result.outcome.question.answer().to_string(),
        });

        if result.is_complete {
            return Ok(PlayOutcome::Completed {
                result_id: result.result_id,
            });
        }
        Ok(PlayOutcome::Continue)
    }

    /// Retry saving a completed session after a failed write.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the write fails again.
    pub async fn retry_save(
        &mut self,
        session_loop: &SessionLoopService,
    ) -> Result<ResultId, ViewError> {
        session_loop
            .save_completed(&mut self.session)
            .await
            .map_err(|_| ViewError::Unknown)
    }
}

/// # Errors
///
/// Returns `ViewError::Unknown` if the session cannot be started.
pub fn start_play(
    session_loop: &SessionLoopService,
    user: &AuthenticatedUser,
) -> Result<PlayVm, ViewError> {
    session_loop
        .start_session(user)
        .map(PlayVm::new)
        .map_err(|_| ViewError::Unknown)
}
