use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::model::{GameResult, ResultId, Tally, UserId};
use storage::repository::{ResultRepository, ResultRow};
use tracing::info;

use crate::Clock;
use crate::auth_service::AuthenticatedUser;
use crate::error::ResultServiceError;

/// How many sessions the statistics view shows.
pub const RECENT_RESULTS_LIMIT: u32 = 10;

/// Presentation-agnostic view of one stored result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultEntry {
    pub id: ResultId,
    pub correct: u32,
    pub wrong: u32,
    pub completed_at: DateTime<Utc>,
}

impl ResultEntry {
    #[must_use]
    pub fn from_row(row: &ResultRow) -> Self {
        Self {
            id: row.id,
            correct: row.result.correct(),
            wrong: row.result.wrong(),
            completed_at: row.result.completed_at(),
        }
    }

    /// `(correct, wrong)` pair.
    #[must_use]
    pub fn counts(&self) -> (u32, u32) {
        (self.correct, self.wrong)
    }
}

/// Recent sessions plus personal best for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    /// Most recent first.
    pub recent: Vec<ResultEntry>,
    pub best: Option<ResultEntry>,
}

impl Statistics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty() && self.best.is_none()
    }
}

/// Result store facade: append-only writes and history queries.
#[derive(Clone)]
pub struct ResultService {
    clock: Clock,
    results: Arc<dyn ResultRepository>,
}

impl ResultService {
    #[must_use]
    pub fn new(clock: Clock, results: Arc<dyn ResultRepository>) -> Self {
        Self { clock, results }
    }

    /// Append a result stamped with the current clock time.
    ///
    /// # Errors
    ///
    /// Returns `ResultServiceError::Storage` on repository failures, including an unknown user.
    pub async fn save(
        &self,
        user_id: UserId,
        correct: u32,
        wrong: u32,
    ) -> Result<ResultId, ResultServiceError> {
        let result = GameResult::new(user_id, Tally::new(correct, wrong), self.clock.now());
        self.record(&result).await
    }

    /// Append an already built result.
    ///
    /// # Errors
    ///
    /// Returns `ResultServiceError::Storage` on repository failures.
    pub async fn record(&self, result: &GameResult) -> Result<ResultId, ResultServiceError> {
        let id = self.results.append_result(result).await?;
        info!(
            result_id = %id,
            user_id = %result.user_id(),
            correct = result.correct(),
            wrong = result.wrong(),
            "saved result"
        );
        Ok(id)
    }

    /// Up to `limit` results, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `ResultServiceError::Storage` on repository failures.
    pub async fn recent(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<ResultEntry>, ResultServiceError> {
        let rows = self.results.list_recent_results(user_id, limit).await?;
        Ok(rows.iter().map(ResultEntry::from_row).collect())
    }

    /// Result with the most correct answers; the earliest one on ties.
    ///
    /// # Errors
    ///
    /// Returns `ResultServiceError::Storage` on repository failures.
    pub async fn best(&self, user_id: UserId) -> Result<Option<ResultEntry>, ResultServiceError> {
        let row = self.results.best_result(user_id).await?;
        Ok(row.as_ref().map(ResultEntry::from_row))
    }

    /// Data for the statistics view.
    ///
    /// # Errors
    ///
    /// Returns `ResultServiceError::Storage` on repository failures.
    pub async fn statistics(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<Statistics, ResultServiceError> {
        let recent = self.recent(user.id(), RECENT_RESULTS_LIMIT).await?;
        let best = self.best(user.id()).await?;
        Ok(Statistics { recent, best })
    }
}
