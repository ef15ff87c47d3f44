use std::sync::Arc;

use quiz_core::model::{Credentials, UserId, Username};
use storage::repository::{NewUserRecord, StorageError, UserRepository};
use tracing::{info, warn};

use crate::error::AuthError;

/// Proof of a successful login.
///
/// Only `AuthService::authenticate` can construct one, so holding a value
/// means the credentials were checked against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    id: UserId,
    username: Username,
}

impl AuthenticatedUser {
    pub(crate) fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }
}

/// Credential store: registration and password login.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(storage::repository::InMemoryRepository::new()))
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` for an empty username or password,
    /// `AuthError::AlreadyExists` if the username is taken, and
    /// `AuthError::Storage` for other repository failures.
    pub async fn register(&self, username: &str, password: &str) -> Result<UserId, AuthError> {
        let credentials = Credentials::new(username, password)?;
        let record = NewUserRecord::from_credentials(&credentials)?;

        let id = self.users.insert_user(record).await.map_err(|e| match e {
            StorageError::Conflict => AuthError::AlreadyExists,
            other => AuthError::Storage(other),
        })?;

        info!(user_id = %id, username = %credentials.username(), "registered user");
        Ok(id)
    }

    /// Check a username/password pair.
    ///
    /// Returns `Ok(None)` for an unknown username or a wrong password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` for an empty username or password and
    /// `AuthError::Storage` if the lookup fails.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AuthenticatedUser>, AuthError> {
        let credentials = Credentials::new(username, password)?;

        let Some(user) = self
            .users
            .find_user_by_username(credentials.username())
            .await?
        else {
            warn!(username = %credentials.username(), "login rejected: unknown user");
            return Ok(None);
        };

        if !user.verify_password(credentials.password()) {
            warn!(username = %credentials.username(), "login rejected: wrong password");
            return Ok(None);
        }

        info!(user_id = %user.id(), "login succeeded");
        Ok(Some(AuthenticatedUser::new(
            user.id(),
            user.username().clone(),
        )))
    }
}
