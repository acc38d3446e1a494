//! Login gate in front of the board.
//!
//! Credential checking lives behind [`Authenticator`]; the board only cares
//! whether a session was granted. A denial is kept as a message for the user
//! and never reaches the store.

use crate::{
    error::{BoardError, Result},
    store::BoardStore,
};
use async_trait::async_trait;
use std::fmt;
use tracing::info;

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque token issued by the authentication backend
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Granted(SessionToken),
    Denied { message: String },
}

/// Backend that checks credentials (login service, registration API, ...)
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Checks the credentials. `Err` is reserved for backend failures;
    /// wrong credentials are an `AuthOutcome::Denied`.
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthOutcome>;
}

/// Holds the board store and only hands it out to an authenticated session
pub struct BoardGate {
    store: BoardStore,
    session: Option<SessionToken>,
    last_denial: Option<String>,
}

impl BoardGate {
    pub fn new(store: BoardStore) -> Self {
        Self {
            store,
            session: None,
            last_denial: None,
        }
    }

    /// Attempts a login and returns whether it was granted
    pub async fn login(
        &mut self,
        authenticator: &dyn Authenticator,
        credentials: &Credentials,
    ) -> Result<bool> {
        match authenticator.authenticate(credentials).await? {
            AuthOutcome::Granted(token) => {
                info!(username = %credentials.username, "Login granted");
                self.session = Some(token);
                self.last_denial = None;
                Ok(true)
            }
            AuthOutcome::Denied { message } => {
                info!(username = %credentials.username, "Login denied");
                self.session = None;
                self.last_denial = Some(message);
                Ok(false)
            }
        }
    }

    pub fn logout(&mut self) {
        self.session = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }

    /// Message from the most recent denied login, for display
    pub fn last_denial(&self) -> Option<&str> {
        self.last_denial.as_deref()
    }

    pub fn store(&self) -> Result<&BoardStore> {
        if self.session.is_none() {
            return Err(BoardError::NotAuthenticated);
        }
        Ok(&self.store)
    }

    pub fn store_mut(&mut self) -> Result<&mut BoardStore> {
        if self.session.is_none() {
            return Err(BoardError::NotAuthenticated);
        }
        Ok(&mut self.store)
    }

    /// Gives the store back, e.g. to save its snapshot on shutdown
    pub fn into_store(self) -> BoardStore {
        self.store
    }
}
