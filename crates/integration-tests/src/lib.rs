//! Integration tests for Quince.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quince-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_manager` - cart lifecycle, line uniqueness, totals
//! - `cart_merge` - anonymous-to-account reconciliation
//! - `wishlist` - wishlist membership and toggle convergence
//! - `catalog` - display enrichment degrades instead of failing
//!
//! All tests run against the in-memory ledger backend; the Postgres backend
//! shares its semantics through the same store contract and is covered by
//! schema constraints plus the migration files.

#![cfg_attr(not(test), forbid(unsafe_code))]

use rust_decimal::Decimal;

use quince_cart::NewCartItem;
use quince_core::ProductId;

/// A plain cart line for `product` with a price given in cents.
#[must_use]
pub fn line(product: i32, quantity: i32, cents: i64) -> NewCartItem {
    NewCartItem::new(ProductId::new(product), quantity, Decimal::new(cents, 2))
}
