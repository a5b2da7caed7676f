//! Ledger entity types.
//!
//! These are the records the reconciliation engine reads and writes through
//! the [`ItemLedgerStore`](crate::store::ItemLedgerStore) contract. Catalog
//! content (names, images) is never stored here; items carry only IDs and
//! the numeric price captured at add time.

pub mod cart;
pub mod wishlist;

pub use cart::{Cart, CartItem, CartTotals, DescribedCartItem, NewCartItem};
pub use wishlist::{Wishlist, WishlistItem, WishlistToggle};
