use std::fmt;

use thiserror::Error;

use crate::model::ids::UserId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("password must not be empty")]
    EmptyPassword,
}

//
// ─── USERNAME ─────────────────────────────────────────────────────────────────
//

/// Login name of a user. Stored exactly as typed; only the empty string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a validated username.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyUsername` if the value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, UserError> {
        let value = value.into();
        if value.is_empty() {
            return Err(UserError::EmptyUsername);
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── PASSWORD HASH ────────────────────────────────────────────────────────────
//

/// Unsalted SHA-256 digest of a password, lowercase hex.
///
/// This is a fast general-purpose hash, not a password KDF. The first release
/// of the game stored the same digest in a `password` column, which migrations
/// rename, so its accounts still log in.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyPassword` if the password is empty.
    pub fn digest(password: &str) -> Result<Self, UserError> {
        if password.is_empty() {
            return Err(UserError::EmptyPassword);
        }
        Ok(Self(sha256::digest(password)))
    }

    /// Rehydrate a stored hash without re-hashing.
    #[must_use]
    pub fn from_persisted(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Plain string equality against the digest of `password`.
    #[must_use]
    pub fn matches(&self, password: &str) -> bool {
        self.0 == sha256::digest(password)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

//
// ─── CREDENTIALS ──────────────────────────────────────────────────────────────
//

/// Validated username + password pair as entered on the login form.
#[derive(Clone)]
pub struct Credentials {
    username: Username,
    password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns `UserError` if either field is empty. The username is checked first.
    pub fn new(username: &str, password: &str) -> Result<Self, UserError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(UserError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: password.to_owned(),
        })
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Hash the password for storage.
    ///
    /// # Errors
    ///
    /// Never fails for validated credentials; the signature mirrors `PasswordHash::digest`.
    pub fn password_hash(&self) -> Result<PasswordHash, UserError> {
        PasswordHash::digest(&self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

//
// ─── USER ─────────────────────────────────────────────────────────────────────
//

/// A registered player. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    password_hash: PasswordHash,
}

impl User {
    #[must_use]
    pub fn from_persisted(id: UserId, username: Username, password_hash: PasswordHash) -> Self {
        Self {
            id,
            username,
            password_hash,
        }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// True if `password` hashes to the stored digest.
    #[must_use]
    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash.matches(password)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
