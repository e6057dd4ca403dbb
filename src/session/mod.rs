//! Per-user conversation sessions
//!
//! A session is the explicit state of one user's collection sequence. The
//! state is a tagged variant, not a reconstruction from which fields happen
//! to be set, and a chart can only exist inside `ChartReady` -- so a session
//! can never hold a chart while missing part of its birth input.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{BirthDate, BirthInput, BirthTime, NatalChart};

/// Opaque user identity from the transport layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The collection sequence, in strict forward order
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    AwaitingDate,
    AwaitingTime {
        date: BirthDate,
    },
    AwaitingPlace {
        date: BirthDate,
        time: BirthTime,
    },
    ChartReady {
        input: BirthInput,
        chart: NatalChart,
    },
}

impl SessionState {
    pub fn tag(&self) -> StateTag {
        match self {
            SessionState::AwaitingDate => StateTag::AwaitingDate,
            SessionState::AwaitingTime { .. } => StateTag::AwaitingTime,
            SessionState::AwaitingPlace { .. } => StateTag::AwaitingPlace,
            SessionState::ChartReady { .. } => StateTag::ChartReady,
        }
    }
}

/// Data-free state tag for the presentation boundary
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateTag {
    AwaitingDate,
    AwaitingTime,
    AwaitingPlace,
    ChartReady,
}

/// One user's session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingDate,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory session store keyed by user identity
///
/// Owned by the dispatch layer and injected into the engine; sessions are
/// independent and never share mutable state. Nothing here persists across a
/// restart.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<UserId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session for a user, created in `AwaitingDate` on first access
    pub fn session_mut(&mut self, user: &UserId) -> &mut Session {
        self.sessions.entry(user.clone()).or_default()
    }

    /// Read-only view of a session, if the user has one
    pub fn session(&self, user: &UserId) -> Option<&Session> {
        self.sessions.get(user)
    }

    /// Discard all session data for a user and start over
    pub fn reset(&mut self, user: &UserId) {
        self.sessions.insert(user.clone(), Session::new());
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
