//! Wishlist Manager - account-scoped saved products.
//!
//! Every operation takes the account ID directly; wishlists are never
//! session-scoped. Add and remove are idempotent, and the existence check
//! answers false for users who never created a wishlist instead of
//! erroring.

use tracing::instrument;

use quince_core::{ProductId, UserId};

use crate::error::Result;
use crate::models::{Wishlist, WishlistItem, WishlistToggle};
use crate::store::ItemLedgerStore;

/// Manager for wishlist lifecycle and membership.
pub struct WishlistManager<'a> {
    store: &'a dyn ItemLedgerStore,
}

impl<'a> WishlistManager<'a> {
    /// Create a new wishlist manager over a ledger store.
    #[must_use]
    pub const fn new(store: &'a dyn ItemLedgerStore) -> Self {
        Self { store }
    }

    /// The user's wishlist, created lazily on first access.
    ///
    /// Same atomicity contract as cart get-or-create: concurrent calls for
    /// the same user converge on one wishlist.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Wishlist> {
        Ok(self.store.insert_or_fetch_wishlist(user_id).await?)
    }

    /// Save a product. A duplicate add is a no-op success, never an error.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    #[instrument(skip(self))]
    pub async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<()> {
        let wishlist = self.get_or_create(user_id).await?;
        self.store
            .insert_wishlist_item(wishlist.id, product_id)
            .await?;
        Ok(())
    }

    /// Unsave a product. Success whether or not it was saved.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: UserId, product_id: ProductId) -> Result<()> {
        let Some(wishlist) = self.store.find_wishlist(user_id).await? else {
            return Ok(());
        };
        self.store
            .delete_wishlist_item(wishlist.id, product_id)
            .await?;
        Ok(())
    }

    /// Whether the product is saved. Answers false for users with no
    /// wishlist yet.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    pub async fn contains(&self, user_id: UserId, product_id: ProductId) -> Result<bool> {
        let Some(wishlist) = self.store.find_wishlist(user_id).await? else {
            return Ok(false);
        };
        Ok(self
            .store
            .wishlist_item_exists(wishlist.id, product_id)
            .await?)
    }

    /// Flip a product in or out of the wishlist, reporting the resulting
    /// state.
    ///
    /// Not atomic against a concurrent toggle of the same pair; the store's
    /// uniqueness invariant still guarantees a valid end state, so the worst
    /// race outcome is a flicker, never a duplicate row.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    #[instrument(skip(self))]
    pub async fn toggle(&self, user_id: UserId, product_id: ProductId) -> Result<WishlistToggle> {
        let wishlist = self.get_or_create(user_id).await?;
        if self
            .store
            .insert_wishlist_item(wishlist.id, product_id)
            .await?
        {
            return Ok(WishlistToggle::Added);
        }
        // Already present: the toggle removes it.
        self.store
            .delete_wishlist_item(wishlist.id, product_id)
            .await?;
        Ok(WishlistToggle::Removed)
    }

    /// All saved products in added order. Empty for users with no wishlist.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    pub async fn items(&self, user_id: UserId) -> Result<Vec<WishlistItem>> {
        let Some(wishlist) = self.store.find_wishlist(user_id).await? else {
            return Ok(Vec::new());
        };
        Ok(self.store.wishlist_items(wishlist.id).await?)
    }

    /// Delete every saved product. The wishlist row is retained.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails.
    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: UserId) -> Result<()> {
        let Some(wishlist) = self.store.find_wishlist(user_id).await? else {
            return Ok(());
        };
        self.store.delete_wishlist_items(wishlist.id).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryLedger;

    #[tokio::test]
    async fn test_contains_without_wishlist_is_false() {
        let ledger = MemoryLedger::new();
        let wishlists = WishlistManager::new(&ledger);
        assert!(
            !wishlists
                .contains(UserId::new(1), ProductId::new(1))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_duplicate_add_is_noop() {
        let ledger = MemoryLedger::new();
        let wishlists = WishlistManager::new(&ledger);
        let user = UserId::new(2);
        let product = ProductId::new(5);

        wishlists.add(user, product).await.unwrap();
        wishlists.add(user, product).await.unwrap();

        assert_eq!(wishlists.items(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let ledger = MemoryLedger::new();
        let wishlists = WishlistManager::new(&ledger);
        let user = UserId::new(3);
        let product = ProductId::new(5);

        // No wishlist yet: still a success.
        wishlists.remove(user, product).await.unwrap();

        wishlists.add(user, product).await.unwrap();
        wishlists.remove(user, product).await.unwrap();
        wishlists.remove(user, product).await.unwrap();
        assert!(!wishlists.contains(user, product).await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_converges() {
        let ledger = MemoryLedger::new();
        let wishlists = WishlistManager::new(&ledger);
        let user = UserId::new(4);
        let product = ProductId::new(9);

        let first = wishlists.toggle(user, product).await.unwrap();
        assert!(first.added());
        assert!(wishlists.contains(user, product).await.unwrap());

        let second = wishlists.toggle(user, product).await.unwrap();
        assert!(!second.added());
        assert!(!wishlists.contains(user, product).await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_empties_wishlist() {
        let ledger = MemoryLedger::new();
        let wishlists = WishlistManager::new(&ledger);
        let user = UserId::new(5);

        wishlists.add(user, ProductId::new(1)).await.unwrap();
        wishlists.add(user, ProductId::new(2)).await.unwrap();
        wishlists.clear(user).await.unwrap();

        assert!(wishlists.items(user).await.unwrap().is_empty());
        // Clearing an already-empty (or absent) wishlist is a success.
        wishlists.clear(UserId::new(99)).await.unwrap();
    }

    #[tokio::test]
    async fn test_items_in_added_order() {
        let ledger = MemoryLedger::new();
        let wishlists = WishlistManager::new(&ledger);
        let user = UserId::new(6);

        wishlists.add(user, ProductId::new(30)).await.unwrap();
        wishlists.add(user, ProductId::new(10)).await.unwrap();
        wishlists.add(user, ProductId::new(20)).await.unwrap();

        let products: Vec<_> = wishlists
            .items(user)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.product_id)
            .collect();
        assert_eq!(
            products,
            vec![ProductId::new(30), ProductId::new(10), ProductId::new(20)]
        );
    }
}
