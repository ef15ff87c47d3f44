use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameResultError {
    #[error("tally overflow: {correct} correct + {wrong} wrong")]
    Overflow { correct: u32, wrong: u32 },
}

//
// ─── TALLY ────────────────────────────────────────────────────────────────────
//

/// Running count of correct and wrong answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    correct: u32,
    wrong: u32,
}

impl Tally {
    #[must_use]
    pub fn new(correct: u32, wrong: u32) -> Self {
        Self { correct, wrong }
    }

    /// Count one answer.
    pub fn record(&mut self, is_correct: bool) {
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        } else {
            self.wrong = self.wrong.saturating_add(1);
        }
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.correct.saturating_add(self.wrong)
    }
}

//
// ─── GAME RESULT ──────────────────────────────────────────────────────────────
//

/// Final tallies of one completed session, as written to the result store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    user_id: UserId,
    tally: Tally,
    completed_at: DateTime<Utc>,
}

impl GameResult {
    #[must_use]
    pub fn new(user_id: UserId, tally: Tally, completed_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            tally,
            completed_at,
        }
    }

    /// Rehydrate a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `GameResultError::Overflow` if the counts cannot be summed.
    pub fn from_persisted(
        user_id: UserId,
        correct: u32,
        wrong: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        if correct.checked_add(wrong).is_none() {
            return Err(GameResultError::Overflow { correct, wrong });
        }
        Ok(Self::new(user_id, Tally::new(correct, wrong), completed_at))
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn tally(&self) -> Tally {
        self.tally
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.tally.correct()
    }

    #[must_use]
    pub fn wrong(&self) -> u32 {
        self.tally.wrong()
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}
