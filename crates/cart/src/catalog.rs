//! Catalog Reference Resolver contract.
//!
//! The ledger stores only product/variant IDs and the captured price;
//! display data (name, image, slug) lives in the catalog system. The cart
//! read path consumes this contract for enrichment only, and a catalog
//! failure degrades the read to ID-only output instead of failing it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quince_core::{ProductId, VariantId};

/// Display data for a product or variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub image: Option<String>,
    pub slug: String,
}

/// Failures from the catalog system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog has no entry for the requested IDs.
    #[error("unknown product")]
    UnknownProduct,

    /// The catalog system failed to respond.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read-only source of line-item display data.
#[async_trait]
pub trait CatalogResolver: Send + Sync {
    /// Look up display data by product (and optional variant) ID.
    async fn describe(
        &self,
        product_id: ProductId,
        variant_id: Option<VariantId>,
    ) -> Result<ProductSummary, CatalogError>;
}

/// A resolver that knows nothing; every read degrades to ID-only output.
///
/// Useful for embeddings that render carts from their own catalog cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCatalog;

#[async_trait]
impl CatalogResolver for NullCatalog {
    async fn describe(
        &self,
        _product_id: ProductId,
        _variant_id: Option<VariantId>,
    ) -> Result<ProductSummary, CatalogError> {
        Err(CatalogError::UnknownProduct)
    }
}
