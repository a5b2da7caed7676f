//! Cart and cart line records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quince_core::{CartId, CartItemId, CartOwner, ProductId, VariantId};

use crate::catalog::ProductSummary;

/// A shopper's saved cart.
///
/// A cart belongs to exactly one owner and is the unit of archival: once
/// `archived` flips to true the cart is immutable and excluded from owner
/// lookups. Archival is monotonic; it is never reversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart's ledger ID.
    pub id: CartId,
    /// The session or account the cart belongs to.
    pub owner: CartOwner,
    /// Whether this cart has been superseded (e.g. by a login merge).
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line in a cart.
///
/// Within one live cart the (`product_id`, `variant_id`) pair is unique;
/// adding an already-present pair increases `quantity` instead of inserting
/// a second row. `unit_price` is captured when the line is first added and
/// never re-derived from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Line's ledger ID.
    pub id: CartItemId,
    /// The cart that exclusively owns this line.
    pub cart_id: CartId,
    pub product_id: ProductId,
    /// `None` means the base product, no variant.
    pub variant_id: Option<VariantId>,
    /// Always >= 1; a zero-quantity line is deleted, never stored.
    pub quantity: i32,
    /// Price per unit at the time the line was first added.
    pub unit_price: Decimal,
    /// Free-form line annotations (e.g. selected option labels).
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Price of the whole line (`quantity * unit_price`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Request value for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub metadata: Option<serde_json::Value>,
}

impl NewCartItem {
    /// A plain line with no variant and no metadata.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: i32, unit_price: Decimal) -> Self {
        Self {
            product_id,
            variant_id: None,
            quantity,
            unit_price,
            metadata: None,
        }
    }

    /// Set the variant dimension.
    #[must_use]
    pub const fn with_variant(mut self, variant_id: VariantId) -> Self {
        self.variant_id = Some(variant_id);
        self
    }

    /// Attach free-form line metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Aggregate view of a cart, computed on demand and never cached in the
/// cart row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of line quantities.
    pub item_count: u32,
    /// Sum of `quantity * unit_price` across lines.
    pub subtotal: Decimal,
}

/// A cart line enriched with catalog display data.
///
/// `display` is `None` when the catalog resolver failed or had no entry;
/// the underlying ledger read never fails on catalog trouble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribedCartItem {
    pub item: CartItem,
    pub display: Option<ProductSummary>,
}
