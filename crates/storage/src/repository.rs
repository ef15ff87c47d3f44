use async_trait::async_trait;
use quiz_core::model::{
    Credentials, GameResult, PasswordHash, ResultId, User, UserError, UserId, Username,
};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a user; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub username: Username,
    pub password_hash: PasswordHash,
}

impl NewUserRecord {
    /// Hash the credentials' password into an insertable record.
    ///
    /// # Errors
    ///
    /// Returns `UserError` if the password cannot be hashed.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self, UserError> {
        Ok(Self {
            username: credentials.username().clone(),
            password_hash: credentials.password_hash()?,
        })
    }
}

/// A persisted result together with its row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: ResultId,
    pub result: GameResult,
}

impl ResultRow {
    #[must_use]
    pub fn new(id: ResultId, result: GameResult) -> Self {
        Self { id, result }
    }
}

/// Repository contract for registered users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return its generated id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the username is taken, or other storage errors.
    async fn insert_user(&self, user: NewUserRecord) -> Result<UserId, StorageError>;

    /// Look up a user by exact username.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup itself fails.
    async fn find_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, StorageError>;
}

/// Append-only repository for per-session results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append one result row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user does not exist, or other storage errors.
    async fn append_result(&self, result: &GameResult) -> Result<ResultId, StorageError>;

    /// Results for a user, most recent first, at most `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on query or mapping failures.
    async fn list_recent_results(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<ResultRow>, StorageError>;

    /// The row with the highest correct count; the earliest row wins ties.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on query or mapping failures.
    async fn best_result(&self, user_id: UserId) -> Result<Option<ResultRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<Mutex<Vec<User>>>,
    results: Arc<Mutex<Vec<ResultRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(len: usize) -> Result<u64, StorageError> {
    u64::try_from(len)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| StorageError::Serialization("id overflow".into()))
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert_user(&self, user: NewUserRecord) -> Result<UserId, StorageError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.iter().any(|u| u.username() == &user.username) {
            return Err(StorageError::Conflict);
        }
        let id = UserId::new(next_id(guard.len())?);
        guard.push(User::from_persisted(id, user.username, user.password_hash));
        Ok(id)
    }

    async fn find_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().find(|u| u.username() == username).cloned())
    }

}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, result: &GameResult) -> Result<ResultId, StorageError> {
        {
            let users = self
                .users
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            if !users.iter().any(|u| u.id() == result.user_id()) {
                return Err(StorageError::NotFound);
            }
        }

        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = ResultId::new(next_id(guard.len())?);
        guard.push(ResultRow::new(id, result.clone()));
        Ok(id)
    }

    async fn list_recent_results(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<ResultRow>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard
            .iter()
            .rev()
            .filter(|row| row.result.user_id() == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn best_result(&self, user_id: UserId) -> Result<Option<ResultRow>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut best: Option<&ResultRow> = None;
        for row in guard.iter().filter(|row| row.result.user_id() == user_id) {
            if best.is_none_or(|b| row.result.correct() > b.result.correct()) {
                best = Some(row);
            }
        }
        Ok(best.cloned())
    }
}

/// Aggregates user and result repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let users: Arc<dyn UserRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo);
        Self { users, results }
    }
}
