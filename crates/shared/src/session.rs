use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identity of whoever drives the current view.
///
/// Passed explicitly into every operation that touches durable state instead
/// of being read from ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { uid: None }
    }

    pub fn user(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.uid.as_deref().is_some_and(|uid| !uid.trim().is_empty())
    }

    /// Returns the uid or fails with [`Error::NotAuthenticated`].
    pub fn require_uid(&self) -> Result<&str> {
        match self.uid.as_deref() {
            Some(uid) if !uid.trim().is_empty() => Ok(uid),
            _ => Err(Error::NotAuthenticated),
        }
    }
}
