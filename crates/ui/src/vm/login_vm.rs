use services::{AuthError, AuthService, AuthenticatedUser};

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginIntent {
    Register,
    Play,
    ShowStats,
}

fn map_auth_error(err: &AuthError) -> ViewError {
    match err {
        AuthError::InvalidInput(_) => ViewError::MissingCredentials,
        AuthError::AlreadyExists => ViewError::UsernameTaken,
        _ => ViewError::Unknown,
    }
}

/// Register a new account and return the confirmation shown under the form.
///
/// # Errors
///
/// Returns `ViewError::MissingCredentials` for empty fields,
/// `ViewError::UsernameTaken` for a duplicate name and `ViewError::Unknown`
/// for storage failures.
pub async fn register(
    auth: &AuthService,
    username: &str,
    password: &str,
) -> Result<String, ViewError> {
    auth.register(username, password)
        .await
        .map_err(|e| map_auth_error(&e))?;
    Ok(format!("Registered {username}. You can log in now."))
}

/// # Errors
///
/// Returns `ViewError::InvalidCredentials` when the pair does not match a
/// stored user, otherwise the same errors as [`register`].
pub async fn log_in(
    auth: &AuthService,
    username: &str,
    password: &str,
) -> Result<AuthenticatedUser, ViewError> {
    auth.authenticate(username, password)
        .await
        .map_err(|e| map_auth_error(&e))?
        .ok_or(ViewError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn register_and_log_in_map_errors() {
        let auth = AuthService::in_memory();

        let msg = register(&auth, "alice", "pw123").await.unwrap();
        assert!(msg.contains("alice"));
        assert_eq!(
            register(&auth, "alice", "x").await.unwrap_err(),
            ViewError::UsernameTaken
        );
        assert_eq!(
            register(&auth, "", "x").await.unwrap_err(),
            ViewError::MissingCredentials
        );

        let user = log_in(&auth, "alice", "pw123").await.unwrap();
        assert_eq!(user.username().as_str(), "alice");
        assert_eq!(
            log_in(&auth, "alice", "nope").await.unwrap_err(),
            ViewError::InvalidCredentials
        );
        assert_eq!(
            log_in(&auth, "alice", "").await.unwrap_err(),
            ViewError::MissingCredentials
        );
    }
}
