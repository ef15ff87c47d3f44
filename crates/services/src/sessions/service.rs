use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

use quiz_core::model::{Catalog, GameResult, Question, ResultId, Tally, UserId};

use super::progress::SessionProgress;
use crate::auth_service::AuthenticatedUser;
use crate::error::SessionError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a single playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::NotStarted => "not started",
            SessionState::InProgress => "in progress",
            SessionState::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Feedback for one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question: Question,
    pub is_correct: bool,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One playthrough of the catalog, owned by the caller.
///
/// Walks the shuffled questions in order, counting correct and wrong answers.
/// Persisting the final tally is the job of `SessionLoopService`.
pub struct QuizSession {
    state: SessionState,
    user_id: Option<UserId>,
    questions: Vec<Question>,
    current: usize,
    tally: Tally,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    result_id: Option<ResultId>,
}

impl QuizSession {
    /// A session over `catalog` in its declared order, not yet started.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            state: SessionState::NotStarted,
            user_id: None,
            questions: catalog.questions().to_vec(),
            current: 0,
            tally: Tally::default(),
            started_at: None,
            completed_at: None,
            result_id: None,
        }
    }

    /// Shuffle the questions and begin play for `user`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is `NotStarted`.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        user: &AuthenticatedUser,
        rng: &mut R,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.require(SessionState::NotStarted)?;

        self.questions.shuffle(rng);
        self.user_id = Some(user.id());
        self.current = 0;
        self.tally = Tally::default();
        self.started_at = Some(started_at);
        self.state = SessionState::InProgress;
        Ok(())
    }

    /// The question waiting for an answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is `InProgress`.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.require(SessionState::InProgress)?;
        self.questions
            .get(self.current)
            .ok_or(SessionError::InvalidState(self.state))
    }

    /// Grade `answer` against the current question and advance.
    ///
    /// The final answer moves the session to `Completed`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is `InProgress`.
    pub fn submit(
        &mut self,
        answer: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        let question = self.current_question()?.clone();
        let is_correct = question.accepts(answer);

        self.tally.record(is_correct);
        self.current += 1;
        if self.current >= self.questions.len() {
            self.state = SessionState::Completed;
            self.completed_at = Some(answered_at);
        }

        Ok(AnswerOutcome {
            question,
            is_correct,
            is_complete: self.is_complete(),
        })
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    #[must_use]
    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Questions in play order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Time between `start` and the last answer, once completed.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        Some(self.completed_at? - self.started_at?)
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Id of the stored result once the session has been persisted.
    #[must_use]
    pub fn result_id(&self) -> Option<ResultId> {
        self.result_id
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        SessionProgress {
            total,
            answered: self.current,
            remaining: total.saturating_sub(self.current),
            is_complete: self.is_complete(),
        }
    }

    pub(crate) fn final_result(&self) -> Result<GameResult, SessionError> {
        self.require(SessionState::Completed)?;
        match (self.user_id, self.completed_at) {
            (Some(user_id), Some(completed_at)) => {
                Ok(GameResult::new(user_id, self.tally, completed_at))
            }
            _ => Err(SessionError::InvalidState(self.state)),
        }
    }

    pub(crate) fn set_result_id(&mut self, id: ResultId) {
        self.result_id = Some(id);
    }

    fn require(&self, expected: SessionState) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState(self.state))
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("state", &self.state)
            .field("user_id", &self.user_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("tally", &self.tally)
            .field("result_id", &self.result_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
