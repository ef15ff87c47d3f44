use std::sync::Arc;

use quiz_core::model::{Catalog, ResultId, Tally};
use rand::Rng;
use tracing::{debug, info};

use super::service::{AnswerOutcome, QuizSession};
use crate::Clock;
use crate::auth_service::AuthenticatedUser;
use crate::error::SessionError;
use crate::result_service::ResultService;

/// Result of answering a single question in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswerResult {
    pub outcome: AnswerOutcome,
    pub tally: Tally,
    pub is_complete: bool,
    pub result_id: Option<ResultId>,
}

/// Orchestrates session start and persisted answering.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    catalog: Catalog,
    results: Arc<ResultService>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(clock: Clock, results: Arc<ResultService>) -> Self {
        Self {
            clock,
            catalog: Catalog::standard(),
            results,
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Start a freshly shuffled session for `user`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the new session cannot be started.
    pub fn start_session(&self, user: &AuthenticatedUser) -> Result<QuizSession, SessionError> {
        self.start_session_with_rng(user, &mut rand::rng())
    }

    /// Start a session using the supplied random source for the shuffle.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the new session cannot be started.
    pub fn start_session_with_rng<R: Rng + ?Sized>(
        &self,
        user: &AuthenticatedUser,
        rng: &mut R,
    ) -> Result<QuizSession, SessionError> {
        let mut session = QuizSession::new(&self.catalog);
        session.start(user, rng, self.clock.now())?;
        info!(
            user_id = %user.id(),
            questions = session.progress().total,
            "session started"
        );
        Ok(session)
    }

    /// Grade an answer and persist the result once the last question is answered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session is not in progress
    /// and `SessionError::Results` if saving the final result fails.
    pub async fn submit(
        &self,
        session: &mut QuizSession,
        answer: &str,
    ) -> Result<SessionAnswerResult, SessionError> {
        let outcome = session.submit(answer, self.clock.now())?;
        debug!(
            correct = outcome.is_correct,
            answered = session.progress().answered,
            "answer graded"
        );

        let result_id = if outcome.is_complete {
            Some(self.save_completed(session).await?)
        } else {
            None
        };

        Ok(SessionAnswerResult {
            is_complete: outcome.is_complete,
            tally: session.tally(),
            outcome,
            result_id,
        })
    }

    /// Write the final tally of a completed session.
    ///
    /// Returns the existing id if the session was already saved.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session is not completed
    /// and `SessionError::Results` if the write fails.
    pub async fn save_completed(&self, session: &mut QuizSession) -> Result<ResultId, SessionError> {
        if let Some(id) = session.result_id() {
            return Ok(id);
        }

        let result = session.final_result()?;
        let id = self.results.record(&result).await?;
        session.set_result_id(id);
        info!(
            result_id = %id,
            correct = result.correct(),
            wrong = result.wrong(),
            elapsed_secs = session.elapsed().map(|d| d.num_seconds()),
            "session completed"
        );
        Ok(id)
    }
}
