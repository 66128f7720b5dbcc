//! Key-in bookkeeping for remote-credential users.
//!
//! A user who logs in with service credentials is keyed in under a
//! [`UserKey`] derived from those credentials, so the same account always
//! maps to the same preference set. Keyring storage and the remote account
//! check live outside this crate; this module only tracks who is keyed in.

use std::fmt;

use log::debug;
use secrecy::{ExposeSecret, SecretString};
use sha1::{Digest, Sha1};
use uuid::{Builder, Uuid};
use zeroize::Zeroizing;

/// Username and password of a remote service account.
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Deterministic key a user is keyed in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserKey(Uuid);

impl UserKey {
    /// Derive the key for `credentials`: a version 5 UUID built directly
    /// from the SHA-1 of `username + password`, with no namespace, so keys
    /// match the ones the credential service already hands out.
    pub fn derive(credentials: &Credentials) -> Self {
        let password = credentials.password.expose_secret();
        let mut seed = Zeroizing::new(String::with_capacity(
            credentials.username.len() + password.len(),
        ));
        seed.push_str(&credentials.username);
        seed.push_str(password);

        let digest = Sha1::digest(seed.as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);

        Self(Builder::from_sha1_bytes(bytes).into_uuid())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[derive(Debug)]
struct ActiveUser {
    username: String,
    key: UserKey,
}

/// Who, if anyone, is currently keyed in.
#[derive(Debug, Default)]
pub struct Session {
    active: Option<ActiveUser>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key in the owner of `credentials`, replacing any previous user.
    pub fn key_in(&mut self, credentials: &Credentials) -> UserKey {
        let key = UserKey::derive(credentials);
        debug!("keyed in {} as {key}", credentials.username);
        self.active = Some(ActiveUser {
            username: credentials.username.clone(),
            key,
        });
        key
    }

    /// Key out the current user. Returns whether someone was keyed in.
    pub fn key_out(&mut self) -> bool {
        match self.active.take() {
            Some(user) => {
                debug!("keyed out {}", user.username);
                true
            },
            None => false,
        }
    }

    pub fn is_keyed_in(&self) -> bool {
        self.active.is_some()
    }

    pub fn user_key(&self) -> Option<UserKey> {
        self.active.as_ref().map(|user| user.key)
    }

    pub fn username(&self) -> Option<&str> {
        self.active.as_ref().map(|user| user.username.as_str())
    }
}
