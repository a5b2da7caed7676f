//! Error taxonomy for the reconciliation engine.
//!
//! Every public operation returns `Result<T, CartError>`. Expected
//! conditions are not errors: removing an already-absent item and re-running
//! a completed merge are successes. Only a targeted mutation of a named ID
//! that turns out missing (or archived) is `ItemNotFound`.

use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced by cart and wishlist operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// A non-positive quantity was passed to an operation that requires
    /// quantity >= 1 (or a negative one where zero is allowed).
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i32),

    /// The targeted cart/item does not exist or belongs to an archived cart.
    #[error("item not found")]
    ItemNotFound,

    /// A stored cart violated the one-owner invariant.
    #[error("cart owner conflict")]
    OwnerConflict,

    /// The item ledger store failed to respond. Propagated unchanged;
    /// retry policy belongs to the caller.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for CartError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::OwnerConflict(_) => Self::OwnerConflict,
            StoreError::Unavailable(msg) | StoreError::DataCorruption(msg) => {
                Self::StoreUnavailable(msg)
            }
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
