//! The Item Ledger Store contract.
//!
//! The engine's only shared mutable resource. The trait is typed per table,
//! and every method that touches a uniqueness key carries its atomicity
//! requirement with it: get-or-create is insert-or-fetch, line insertion is
//! an additive upsert, wishlist insertion is conflict-free. Backends enforce
//! the keys natively (unique indexes, or a single lock for the in-memory
//! ledger); managers never do client-side check-then-act on them.
//!
//! Backends:
//!
//! - [`MemoryLedger`] - single-lock in-memory state, the reference
//!   semantics and the test substrate.
//! - `PostgresLedger` (feature `postgres`) - sqlx over a schema whose
//!   unique indexes mirror the invariants.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryLedger;
#[cfg(feature = "postgres")]
pub use postgres::{PostgresLedger, create_pool};

use async_trait::async_trait;
use thiserror::Error;

use quince_core::{
    CartId, CartItemId, CartOwner, OwnerConflictError, ProductId, UserId, WishlistId,
};

use crate::models::{Cart, CartItem, NewCartItem, Wishlist, WishlistItem};

/// Errors surfaced by a ledger backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend failed to respond.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// A stored cart row carried both or neither owner column.
    #[error(transparent)]
    OwnerConflict(#[from] OwnerConflictError),

    /// A stored row failed to decode.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Durable storage for carts, cart lines, wishlists, and wishlist items.
///
/// All methods may block on I/O. Lookups only ever return non-archived
/// carts; archived rows stay in place for audit but are unreachable through
/// [`find_live_cart`](Self::find_live_cart).
#[async_trait]
pub trait ItemLedgerStore: Send + Sync {
    /// The single non-archived cart for an owner, if any.
    async fn find_live_cart(&self, owner: CartOwner) -> Result<Option<Cart>, StoreError>;

    /// Atomic get-or-create on the live-cart-per-owner key.
    ///
    /// Concurrent calls for the same owner must converge on one cart.
    async fn insert_or_fetch_cart(&self, owner: CartOwner) -> Result<Cart, StoreError>;

    /// Fetch a cart by ID, archived or not.
    async fn fetch_cart(&self, cart_id: CartId) -> Result<Option<Cart>, StoreError>;

    /// Flip a cart's `archived` flag to true. No-op if already archived
    /// or absent; the flag is monotonic.
    async fn archive_cart(&self, cart_id: CartId) -> Result<(), StoreError>;

    /// Atomic insert-or-add-quantity on (cart, product, variant).
    ///
    /// If the line already exists its quantity grows by `line.quantity` and
    /// its unit price and metadata are left unchanged (first-added wins).
    async fn upsert_cart_item(
        &self,
        cart_id: CartId,
        line: NewCartItem,
    ) -> Result<CartItem, StoreError>;

    /// Fetch one cart line by ID.
    async fn fetch_cart_item(&self, item_id: CartItemId) -> Result<Option<CartItem>, StoreError>;

    /// Overwrite a line's quantity. Returns false if the line is absent.
    async fn update_item_quantity(
        &self,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<bool, StoreError>;

    /// Physically delete one line. Returns false if it was already absent.
    async fn delete_cart_item(&self, item_id: CartItemId) -> Result<bool, StoreError>;

    /// Delete every line of a cart, returning how many were removed.
    async fn delete_cart_items(&self, cart_id: CartId) -> Result<u64, StoreError>;

    /// All lines of a cart in insertion order.
    async fn cart_items(&self, cart_id: CartId) -> Result<Vec<CartItem>, StoreError>;

    /// Atomic get-or-create on the one-wishlist-per-user key.
    async fn insert_or_fetch_wishlist(&self, user_id: UserId) -> Result<Wishlist, StoreError>;

    /// The user's wishlist, if one has ever been created.
    async fn find_wishlist(&self, user_id: UserId) -> Result<Option<Wishlist>, StoreError>;

    /// Insert a product into a wishlist. Returns false (and changes
    /// nothing) if the product is already present.
    async fn insert_wishlist_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, StoreError>;

    /// Delete a product from a wishlist. Returns false if it was absent.
    async fn delete_wishlist_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, StoreError>;

    /// Whether a product is present in a wishlist.
    async fn wishlist_item_exists(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, StoreError>;

    /// All items of a wishlist in added order.
    async fn wishlist_items(&self, wishlist_id: WishlistId)
    -> Result<Vec<WishlistItem>, StoreError>;

    /// Delete every item of a wishlist, returning how many were removed.
    async fn delete_wishlist_items(&self, wishlist_id: WishlistId) -> Result<u64, StoreError>;
}
