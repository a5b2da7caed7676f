//! Cart ownership as a tagged union.
//!
//! A live cart belongs to exactly one identity at a time: an anonymous
//! session or an authenticated account. Modeling this as an enum makes the
//! "exactly one owner kind" invariant structural; the two nullable columns
//! only exist at the storage boundary and are reconstructed through
//! [`CartOwner::from_columns`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{SessionId, UserId};

/// The identity a cart belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CartOwner {
    /// Anonymous visitor, keyed by session token.
    Session(SessionId),
    /// Authenticated customer, keyed by account ID.
    Account(UserId),
}

/// A stored cart row carried both or neither owner column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cart owner columns are inconsistent: exactly one of session_id/user_id must be set")]
pub struct OwnerConflictError;

impl CartOwner {
    /// Reconstruct an owner from the two nullable storage columns.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerConflictError`] if both or neither column is set.
    pub const fn from_columns(
        session_id: Option<SessionId>,
        user_id: Option<UserId>,
    ) -> Result<Self, OwnerConflictError> {
        match (session_id, user_id) {
            (Some(session), None) => Ok(Self::Session(session)),
            (None, Some(user)) => Ok(Self::Account(user)),
            _ => Err(OwnerConflictError),
        }
    }

    /// Split an owner into the two nullable storage columns.
    #[must_use]
    pub const fn into_columns(self) -> (Option<SessionId>, Option<UserId>) {
        match self {
            Self::Session(session) => (Some(session), None),
            Self::Account(user) => (None, Some(user)),
        }
    }

    /// Whether this owner is an anonymous session.
    #[must_use]
    pub const fn is_session(&self) -> bool {
        matches!(self, Self::Session(_))
    }

    /// Whether this owner is an authenticated account.
    #[must_use]
    pub const fn is_account(&self) -> bool {
        matches!(self, Self::Account(_))
    }
}

impl std::fmt::Display for CartOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Session(id) => write!(f, "session:{id}"),
            Self::Account(id) => write!(f, "account:{id}"),
        }
    }
}

impl From<SessionId> for CartOwner {
    fn from(id: SessionId) -> Self {
        Self::Session(id)
    }
}

impl From<UserId> for CartOwner {
    fn from(id: UserId) -> Self {
        Self::Account(id)
    }
}
