#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! User registry and opaque session tokens for the RO-PE API.
//!
//! The server only needs one thing from this crate: given a bearer token,
//! either an authenticated caller identity or nothing. Users are held in
//! memory with salted SHA-256 password digests, and sessions are opaque
//! random tokens. This is deliberately a narrow collaborator, not an
//! authentication protocol.

use std::collections::BTreeMap;
use std::sync::RwLock;

use sha2::{Digest as _, Sha256};
use uuid::Uuid;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The user's unique id.
    pub user_id: Uuid,
    /// The user's display name.
    pub name: String,
    /// The user's email address (lowercased).
    pub email: String,
}

/// A successful registration or login: the caller identity plus the
/// session token to present as `Authorization: Bearer <token>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: Identity,
}

/// Errors raised by registration and login.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The email is already registered.
    #[error("email already registered")]
    EmailTaken,
    /// The password is shorter than [`MIN_PASSWORD_CHARS`].
    #[error("password must be at least {MIN_PASSWORD_CHARS} characters")]
    PasswordTooShort,
    /// Unknown email or wrong password. The two cases are deliberately
    /// indistinguishable to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,
}

#[derive(Debug, Clone)]
struct UserRecord {
    id: Uuid,
    name: String,
    email: String,
    salt: String,
    password_digest: String,
}

/// In-memory user registry and session store.
#[derive(Debug, Default)]
pub struct AuthService {
    users: RwLock<BTreeMap<String, UserRecord>>,
    sessions: RwLock<BTreeMap<String, Uuid>>,
}

impl AuthService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new user and opens a session.
    ///
    /// The email is lowercased and trimmed before the uniqueness check.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] for a duplicate email or
    /// [`AuthError::PasswordTooShort`] for a password below the minimum
    /// length.
    ///
    /// # Panics
    ///
    /// Panics if a registry lock is poisoned.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::PasswordTooShort);
        }

        let email = normalize_email(email);
        let salt = Uuid::new_v4().simple().to_string();
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: email.clone(),
            password_digest: digest(&salt, password),
            salt,
        };

        {
            let mut users = self.users.write().expect("user registry lock poisoned");
            if users.contains_key(&email) {
                return Err(AuthError::EmailTaken);
            }
            users.insert(email, record.clone());
        }

        Ok(self.open_session(&record))
    }

    /// Verifies credentials and opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a
    /// wrong password.
    ///
    /// # Panics
    ///
    /// Panics if a registry lock is poisoned.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email);
        let record = {
            let users = self.users.read().expect("user registry lock poisoned");
            users.get(&email).cloned()
        }
        .ok_or(AuthError::InvalidCredentials)?;

        if digest(&record.salt, password) != record.password_digest {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.open_session(&record))
    }

    /// Resolves a bearer token to a caller identity, if the token belongs
    /// to an open session.
    ///
    /// # Panics
    ///
    /// Panics if a registry lock is poisoned.
    #[must_use]
    pub fn authenticate(&self, token: &str) -> Option<Identity> {
        let user_id = {
            let sessions = self.sessions.read().expect("session store lock poisoned");
            sessions.get(token).copied()
        }?;

        let users = self.users.read().expect("user registry lock poisoned");
        users
            .values()
            .find(|record| record.id == user_id)
            .map(identity)
    }

    fn open_session(&self, record: &UserRecord) -> Session {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .insert(token.clone(), record.id);

        Session {
            token,
            user: identity(record),
        }
    }
}

fn identity(record: &UserRecord) -> Identity {
    Identity {
        user_id: record.id,
        name: record.name.clone(),
        email: record.email.clone(),
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
