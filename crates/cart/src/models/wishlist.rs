//! Wishlist records.
//!
//! Wishlists are always account-scoped; there is no anonymous wishlist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quince_core::{ProductId, UserId, WishlistId, WishlistItemId};

/// A customer's wishlist, created lazily on first access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    /// Wishlist's ledger ID.
    pub id: WishlistId,
    /// The account that owns the wishlist.
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A saved product in a wishlist.
///
/// `product_id` is unique within one wishlist; re-adding is a no-op, not a
/// duplicate. There is no variant dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    /// Item's ledger ID.
    pub id: WishlistItemId,
    /// The wishlist that owns this item.
    pub wishlist_id: WishlistId,
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}

/// Resulting state of a wishlist toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WishlistToggle {
    /// The product is now in the wishlist.
    Added,
    /// The product is no longer in the wishlist.
    Removed,
}

impl WishlistToggle {
    /// Whether the toggle left the product in the wishlist.
    #[must_use]
    pub const fn added(self) -> bool {
        matches!(self, Self::Added)
    }
}
