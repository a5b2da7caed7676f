//! Cart Manager - Cart and cart line lifecycle.
//!
//! Owns get-or-create, the additive line upsert, quantity changes, removal,
//! and on-demand aggregation. Uniqueness is enforced by the ledger store;
//! this layer validates input, guards archived carts, and maps store
//! failures into the public taxonomy.

use tracing::instrument;

use quince_core::{CartId, CartItemId, CartOwner};

use crate::catalog::CatalogResolver;
use crate::error::{CartError, Result};
use crate::models::{Cart, CartItem, CartTotals, DescribedCartItem, NewCartItem};
use crate::store::ItemLedgerStore;

/// Manager for cart lifecycle and line mutations.
pub struct CartManager<'a> {
    store: &'a dyn ItemLedgerStore,
}

impl<'a> CartManager<'a> {
    /// Create a new cart manager over a ledger store.
    #[must_use]
    pub const fn new(store: &'a dyn ItemLedgerStore) -> Self {
        Self { store }
    }

    /// The owner's live cart, if any.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    pub async fn find(&self, owner: CartOwner) -> Result<Option<Cart>> {
        Ok(self.store.find_live_cart(owner).await?)
    }

    /// The owner's live cart, created lazily on first access.
    ///
    /// Safe to call concurrently for the same owner; the store's
    /// insert-or-fetch guarantees a single live cart per owner.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, owner: CartOwner) -> Result<Cart> {
        Ok(self.store.insert_or_fetch_cart(owner).await?)
    }

    /// Add a line to a cart.
    ///
    /// If the cart already holds the same (product, variant) pair the
    /// existing line's quantity grows by `line.quantity`; its unit price
    /// stays as first added. Repeated "add to cart" clicks therefore never
    /// produce duplicate rows.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `line.quantity < 1`.
    /// Returns `CartError::ItemNotFound` if the cart is absent or archived.
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    #[instrument(skip(self, line), fields(product_id = %line.product_id))]
    pub async fn add_item(&self, cart_id: CartId, line: NewCartItem) -> Result<CartItem> {
        if line.quantity < 1 {
            return Err(CartError::InvalidQuantity(line.quantity));
        }
        self.live_cart(cart_id).await?;
        Ok(self.store.upsert_cart_item(cart_id, line).await?)
    }

    /// Set a line's quantity; zero deletes the line.
    ///
    /// "Set to zero" and "remove" are deliberately the same success so
    /// callers can treat them uniformly.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 0`.
    /// Returns `CartError::ItemNotFound` if the line does not exist or
    /// belongs to an archived cart.
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    #[instrument(skip(self))]
    pub async fn set_item_quantity(&self, item_id: CartItemId, quantity: i32) -> Result<()> {
        if quantity < 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let item = self
            .store
            .fetch_cart_item(item_id)
            .await?
            .ok_or(CartError::ItemNotFound)?;
        self.live_cart(item.cart_id).await?;

        if quantity == 0 {
            self.store.delete_cart_item(item_id).await?;
            return Ok(());
        }
        if self.store.update_item_quantity(item_id, quantity).await? {
            Ok(())
        } else {
            // Deleted between fetch and update.
            Err(CartError::ItemNotFound)
        }
    }

    /// Remove a line. Idempotent: removing an already-absent line is a
    /// success, so retried client requests are safe.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the line exists but its cart is
    /// archived.
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, item_id: CartItemId) -> Result<()> {
        let Some(item) = self.store.fetch_cart_item(item_id).await? else {
            return Ok(());
        };
        self.live_cart(item.cart_id).await?;
        self.store.delete_cart_item(item_id).await?;
        Ok(())
    }

    /// Delete every line of a cart. The cart row is retained; empty is a
    /// valid state, distinct from archived.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the cart is absent or archived.
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    #[instrument(skip(self))]
    pub async fn clear(&self, cart_id: CartId) -> Result<()> {
        self.live_cart(cart_id).await?;
        self.store.delete_cart_items(cart_id).await?;
        Ok(())
    }

    /// All lines of a cart in insertion order, IDs only.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    pub async fn items(&self, cart_id: CartId) -> Result<Vec<CartItem>> {
        Ok(self.store.cart_items(cart_id).await?)
    }

    /// All lines of a cart, enriched with catalog display data.
    ///
    /// A catalog failure never fails the read; the affected line simply
    /// carries no display data.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    pub async fn items_described(
        &self,
        cart_id: CartId,
        catalog: &dyn CatalogResolver,
    ) -> Result<Vec<DescribedCartItem>> {
        let items = self.items(cart_id).await?;
        let mut described = Vec::with_capacity(items.len());
        for item in items {
            let display = match catalog.describe(item.product_id, item.variant_id).await {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!(product_id = %item.product_id, "catalog describe failed: {e}");
                    None
                }
            };
            described.push(DescribedCartItem { item, display });
        }
        Ok(described)
    }

    /// Aggregate count and subtotal, computed on demand from the lines and
    /// never cached in the cart row.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    pub async fn totals(&self, cart_id: CartId) -> Result<CartTotals> {
        let items = self.items(cart_id).await?;
        let mut totals = CartTotals::default();
        for item in &items {
            totals.item_count = totals
                .item_count
                .saturating_add(u32::try_from(item.quantity).unwrap_or(0));
            totals.subtotal += item.line_total();
        }
        Ok(totals)
    }

    /// Retire a cart. Archival is monotonic and the archived cart keeps its
    /// lines for audit; it just stops resolving through owner lookup.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    #[instrument(skip(self))]
    pub async fn archive(&self, cart_id: CartId) -> Result<()> {
        Ok(self.store.archive_cart(cart_id).await?)
    }

    /// Fetch a cart that must exist and be live, or `ItemNotFound`.
    async fn live_cart(&self, cart_id: CartId) -> Result<Cart> {
        let cart = self
            .store
            .fetch_cart(cart_id)
            .await?
            .ok_or(CartError::ItemNotFound)?;
        if cart.archived {
            return Err(CartError::ItemNotFound);
        }
        Ok(cart)
    }
}
