//! In-memory ledger backend.
//!
//! All state sits behind one async mutex, so every uniqueness key is
//! trivially enforced: each trait method is a single critical section.
//! IDs are issued serially, which makes ID order the insertion order.
//!
//! This backend is the reference semantics for the contract and the
//! substrate for unit and integration tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use quince_core::{
    CartId, CartItemId, CartOwner, ProductId, UserId, WishlistId, WishlistItemId,
};

use crate::models::{Cart, CartItem, NewCartItem, Wishlist, WishlistItem};

use super::{ItemLedgerStore, StoreError};

#[derive(Debug, Default)]
struct LedgerState {
    carts: BTreeMap<CartId, Cart>,
    cart_items: BTreeMap<CartItemId, CartItem>,
    wishlists: BTreeMap<WishlistId, Wishlist>,
    wishlist_items: BTreeMap<WishlistItemId, WishlistItem>,
    next_cart_id: i32,
    next_cart_item_id: i32,
    next_wishlist_id: i32,
    next_wishlist_item_id: i32,
}

impl LedgerState {
    fn next_cart_id(&mut self) -> CartId {
        self.next_cart_id += 1;
        CartId::new(self.next_cart_id)
    }

    fn next_cart_item_id(&mut self) -> CartItemId {
        self.next_cart_item_id += 1;
        CartItemId::new(self.next_cart_item_id)
    }

    fn next_wishlist_id(&mut self) -> WishlistId {
        self.next_wishlist_id += 1;
        WishlistId::new(self.next_wishlist_id)
    }

    fn next_wishlist_item_id(&mut self) -> WishlistItemId {
        self.next_wishlist_item_id += 1;
        WishlistItemId::new(self.next_wishlist_item_id)
    }

    fn live_cart(&self, owner: CartOwner) -> Option<&Cart> {
        self.carts
            .values()
            .find(|cart| !cart.archived && cart.owner == owner)
    }
}

/// An [`ItemLedgerStore`] held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemLedgerStore for MemoryLedger {
    async fn find_live_cart(&self, owner: CartOwner) -> Result<Option<Cart>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.live_cart(owner).cloned())
    }

    async fn insert_or_fetch_cart(&self, owner: CartOwner) -> Result<Cart, StoreError> {
        let mut state = self.state.lock().await;
        if let Some(cart) = state.live_cart(owner) {
            return Ok(cart.clone());
        }
        let now = Utc::now();
        let cart = Cart {
            id: state.next_cart_id(),
            owner,
            archived: false,
            created_at: now,
            updated_at: now,
        };
        state.carts.insert(cart.id, cart.clone());
        Ok(cart)
    }

    async fn fetch_cart(&self, cart_id: CartId) -> Result<Option<Cart>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.carts.get(&cart_id).cloned())
    }

    async fn archive_cart(&self, cart_id: CartId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if let Some(cart) = state.carts.get_mut(&cart_id)
            && !cart.archived
        {
            cart.archived = true;
            cart.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn upsert_cart_item(
        &self,
        cart_id: CartId,
        line: NewCartItem,
    ) -> Result<CartItem, StoreError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let existing = state.cart_items.values_mut().find(|item| {
            item.cart_id == cart_id
                && item.product_id == line.product_id
                && item.variant_id == line.variant_id
        });
        if let Some(item) = existing {
            // First-added price and metadata win; only quantity grows. An
            // overflowing sum surfaces the same way the Postgres backend
            // reports an out-of-range integer.
            let Some(total) = item.quantity.checked_add(line.quantity) else {
                return Err(StoreError::Unavailable(
                    "cart line quantity out of range".to_owned(),
                ));
            };
            item.quantity = total;
            item.updated_at = now;
            return Ok(item.clone());
        }

        let item = CartItem {
            id: state.next_cart_item_id(),
            cart_id,
            product_id: line.product_id,
            variant_id: line.variant_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
            metadata: line.metadata,
            created_at: now,
            updated_at: now,
        };
        state.cart_items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn fetch_cart_item(&self, item_id: CartItemId) -> Result<Option<CartItem>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.cart_items.get(&item_id).cloned())
    }

    async fn update_item_quantity(
        &self,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        match state.cart_items.get_mut(&item_id) {
            Some(item) => {
                item.quantity = quantity;
                item.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_cart_item(&self, item_id: CartItemId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.cart_items.remove(&item_id).is_some())
    }

    async fn delete_cart_items(&self, cart_id: CartId) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let before = state.cart_items.len();
        state.cart_items.retain(|_, item| item.cart_id != cart_id);
        Ok((before - state.cart_items.len()) as u64)
    }

    async fn cart_items(&self, cart_id: CartId) -> Result<Vec<CartItem>, StoreError> {
        let state = self.state.lock().await;
        // BTreeMap iterates in ID order, which is insertion order here.
        Ok(state
            .cart_items
            .values()
            .filter(|item| item.cart_id == cart_id)
            .cloned()
            .collect())
    }

    async fn insert_or_fetch_wishlist(&self, user_id: UserId) -> Result<Wishlist, StoreError> {
        let mut state = self.state.lock().await;
        if let Some(wishlist) = state.wishlists.values().find(|w| w.user_id == user_id) {
            return Ok(wishlist.clone());
        }
        let now = Utc::now();
        let wishlist = Wishlist {
            id: state.next_wishlist_id(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        state.wishlists.insert(wishlist.id, wishlist.clone());
        Ok(wishlist)
    }

    async fn find_wishlist(&self, user_id: UserId) -> Result<Option<Wishlist>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .wishlists
            .values()
            .find(|w| w.user_id == user_id)
            .cloned())
    }

    async fn insert_wishlist_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let present = state
            .wishlist_items
            .values()
            .any(|item| item.wishlist_id == wishlist_id && item.product_id == product_id);
        if present {
            return Ok(false);
        }
        let item = WishlistItem {
            id: state.next_wishlist_item_id(),
            wishlist_id,
            product_id,
            added_at: Utc::now(),
        };
        state.wishlist_items.insert(item.id, item);
        Ok(true)
    }

    async fn delete_wishlist_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let before = state.wishlist_items.len();
        state
            .wishlist_items
            .retain(|_, item| !(item.wishlist_id == wishlist_id && item.product_id == product_id));
        Ok(state.wishlist_items.len() < before)
    }

    async fn wishlist_item_exists(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .wishlist_items
            .values()
            .any(|item| item.wishlist_id == wishlist_id && item.product_id == product_id))
    }

    async fn wishlist_items(
        &self,
        wishlist_id: WishlistId,
    ) -> Result<Vec<WishlistItem>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .wishlist_items
            .values()
            .filter(|item| item.wishlist_id == wishlist_id)
            .cloned()
            .collect())
    }

    async fn delete_wishlist_items(&self, wishlist_id: WishlistId) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let before = state.wishlist_items.len();
        state
            .wishlist_items
            .retain(|_, item| item.wishlist_id != wishlist_id);
        Ok((before - state.wishlist_items.len()) as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quince_core::SessionId;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_insert_or_fetch_cart_is_stable() {
        let ledger = MemoryLedger::new();
        let owner = CartOwner::Session(SessionId::generate());
        let first = ledger.insert_or_fetch_cart(owner).await.unwrap();
        let second = ledger.insert_or_fetch_cart(owner).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_archived_cart_excluded_from_owner_lookup() {
        let ledger = MemoryLedger::new();
        let owner = CartOwner::Account(UserId::new(1));
        let cart = ledger.insert_or_fetch_cart(owner).await.unwrap();
        ledger.archive_cart(cart.id).await.unwrap();

        assert!(ledger.find_live_cart(owner).await.unwrap().is_none());
        // A new get-or-create mints a fresh cart.
        let fresh = ledger.insert_or_fetch_cart(owner).await.unwrap();
        assert_ne!(fresh.id, cart.id);
    }

    #[tokio::test]
    async fn test_upsert_adds_quantity_and_keeps_price() {
        let ledger = MemoryLedger::new();
        let owner = CartOwner::Account(UserId::new(2));
        let cart = ledger.insert_or_fetch_cart(owner).await.unwrap();

        let first = NewCartItem::new(ProductId::new(1), 2, Decimal::new(1000, 2));
        let again = NewCartItem::new(ProductId::new(1), 1, Decimal::new(1250, 2));
        ledger.upsert_cart_item(cart.id, first).await.unwrap();
        let merged = ledger.upsert_cart_item(cart.id, again).await.unwrap();

        assert_eq!(merged.quantity, 3);
        assert_eq!(merged.unit_price, Decimal::new(1000, 2));
        assert_eq!(ledger.cart_items(cart.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_rejects_quantity_overflow() {
        let ledger = MemoryLedger::new();
        let owner = CartOwner::Account(UserId::new(5));
        let cart = ledger.insert_or_fetch_cart(owner).await.unwrap();

        let huge = NewCartItem::new(ProductId::new(1), i32::MAX, Decimal::new(100, 2));
        let one_more = NewCartItem::new(ProductId::new(1), 1, Decimal::new(100, 2));
        ledger.upsert_cart_item(cart.id, huge).await.unwrap();

        let result = ledger.upsert_cart_item(cart.id, one_more).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        // The stored line is untouched by the failed add.
        let items = ledger.cart_items(cart.id).await.unwrap();
        assert_eq!(items[0].quantity, i32::MAX);
    }

    #[tokio::test]
    async fn test_variant_distinguishes_lines() {
        let ledger = MemoryLedger::new();
        let owner = CartOwner::Account(UserId::new(3));
        let cart = ledger.insert_or_fetch_cart(owner).await.unwrap();

        let base = NewCartItem::new(ProductId::new(1), 1, Decimal::new(500, 2));
        let variant = base.clone().with_variant(quince_core::VariantId::new(9));
        ledger.upsert_cart_item(cart.id, base).await.unwrap();
        ledger.upsert_cart_item(cart.id, variant).await.unwrap();

        assert_eq!(ledger.cart_items(cart.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_wishlist_insert_reports_duplicates() {
        let ledger = MemoryLedger::new();
        let wishlist = ledger
            .insert_or_fetch_wishlist(UserId::new(4))
            .await
            .unwrap();
        assert!(
            ledger
                .insert_wishlist_item(wishlist.id, ProductId::new(7))
                .await
                .unwrap()
        );
        assert!(
            !ledger
                .insert_wishlist_item(wishlist.id, ProductId::new(7))
                .await
                .unwrap()
        );
        assert_eq!(ledger.wishlist_items(wishlist.id).await.unwrap().len(), 1);
    }
}
