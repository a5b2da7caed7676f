//! Quince Cart - cart and wishlist state reconciliation.
//!
//! The engine that creates, mutates, and merges a shopper's saved-item
//! state across anonymous (session-scoped) and authenticated
//! (account-scoped) identities. It guarantees no duplicate line items, no
//! lost updates under concurrent mutation, and an idempotent
//! anonymous-to-account cart merge when a session authenticates mid-visit.
//!
//! # Architecture
//!
//! - [`store`] - the Item Ledger Store contract and its backends; the only
//!   shared mutable resource. Uniqueness invariants are enforced here, not
//!   by check-then-act logic above.
//! - [`CartManager`] - cart and line lifecycle: get-or-create, additive
//!   line upsert, quantity changes, removal, on-demand totals.
//! - [`MergeCoordinator`] - the once-per-login reconciliation of an
//!   anonymous cart into the account cart.
//! - [`WishlistManager`] - account-scoped saved products with idempotent
//!   add/remove/toggle.
//! - [`identity`] / [`catalog`] - the collaborator contracts this engine
//!   consumes but does not implement.
//!
//! The engine holds no in-process state between requests; each public
//! operation is a handful of store calls. Every operation is safe to retry
//! after a transient failure (idempotent or additive-safe), so blind retry
//! is a correct caller strategy.
//!
//! # Example
//!
//! ```rust
//! use quince_cart::{CartManager, NewCartItem, store::MemoryLedger};
//! use quince_core::{CartOwner, ProductId, UserId};
//! use rust_decimal::Decimal;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), quince_cart::CartError> {
//! let ledger = MemoryLedger::new();
//! let carts = CartManager::new(&ledger);
//!
//! let cart = carts.get_or_create(CartOwner::Account(UserId::new(1))).await?;
//! carts
//!     .add_item(cart.id, NewCartItem::new(ProductId::new(42), 2, Decimal::new(1999, 2)))
//!     .await?;
//!
//! let totals = carts.totals(cart.id).await?;
//! assert_eq!(totals.item_count, 2);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod store;

mod cart;
mod merge;
mod wishlist;

pub use cart::CartManager;
pub use catalog::{CatalogError, CatalogResolver, NullCatalog, ProductSummary};
pub use config::{ConfigError, LedgerConfig};
pub use error::{CartError, Result};
pub use identity::{IdentityResolver, StaticIdentity};
pub use merge::{MergeCoordinator, MergeOutcome};
pub use models::{
    Cart, CartItem, CartTotals, DescribedCartItem, NewCartItem, Wishlist, WishlistItem,
    WishlistToggle,
};
pub use wishlist::WishlistManager;
