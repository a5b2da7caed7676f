//! Cart Merge Coordinator - anonymous-to-account reconciliation.
//!
//! Runs once per login event, after the session is tied to the account and
//! before the caller treats `Account(user_id)` as the sole cart owner. The
//! whole sequence is idempotent: once the anonymous cart is archived a
//! re-run finds nothing to merge and succeeds trivially.

use tracing::instrument;

use quince_core::{CartId, CartOwner, SessionId, UserId};

use crate::cart::CartManager;
use crate::error::Result;
use crate::models::NewCartItem;
use crate::store::ItemLedgerStore;

/// What a merge did, for the caller's logging and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// The account cart the lines were merged into, when a merge ran.
    pub account_cart: Option<CartId>,
    /// The anonymous cart that was archived, when a merge ran.
    pub archived_cart: Option<CartId>,
    /// How many lines were carried over.
    pub merged_lines: usize,
}

/// Coordinator for the login-time cart merge.
pub struct MergeCoordinator<'a> {
    carts: CartManager<'a>,
}

impl<'a> MergeCoordinator<'a> {
    /// Create a coordinator over a ledger store.
    #[must_use]
    pub const fn new(store: &'a dyn ItemLedgerStore) -> Self {
        Self {
            carts: CartManager::new(store),
        }
    }

    /// Reconcile the session's anonymous cart into the account's cart.
    ///
    /// Each anonymous line is re-added against the account cart through the
    /// additive upsert, so pre-existing account quantities for the same
    /// (product, variant) grow instead of being overwritten or duplicated.
    /// The anonymous cart is archived only after every line has been
    /// processed; on a partial failure the whole merge can be retried and
    /// the upsert absorbs the replayed lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the ledger fails; the
    /// anonymous cart stays live in that case so a retry is safe.
    #[instrument(skip(self))]
    pub async fn merge_on_authentication(
        &self,
        session_id: SessionId,
        user_id: UserId,
    ) -> Result<MergeOutcome> {
        let Some(session_cart) = self.carts.find(CartOwner::Session(session_id)).await? else {
            // Nothing to merge: never had a cart, or a previous merge
            // already archived it.
            return Ok(MergeOutcome::default());
        };

        let account_cart = self
            .carts
            .get_or_create(CartOwner::Account(user_id))
            .await?;
        let lines = self.carts.items(session_cart.id).await?;
        let merged_lines = lines.len();

        for item in lines {
            let line = NewCartItem {
                product_id: item.product_id,
                variant_id: item.variant_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                metadata: item.metadata,
            };
            self.carts.add_item(account_cart.id, line).await?;
        }

        // Only after every line landed; the archived cart keeps its lines
        // for audit but stops resolving through session lookup.
        self.carts.archive(session_cart.id).await?;

        tracing::info!(
            session_cart = %session_cart.id,
            account_cart = %account_cart.id,
            merged_lines,
            "merged anonymous cart into account cart"
        );

        Ok(MergeOutcome {
            account_cart: Some(account_cart.id),
            archived_cart: Some(session_cart.id),
            merged_lines,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryLedger;
    use quince_core::{ProductId, VariantId};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_merge_with_no_session_cart_is_trivial() {
        let ledger = MemoryLedger::new();
        let coordinator = MergeCoordinator::new(&ledger);

        let outcome = coordinator
            .merge_on_authentication(SessionId::generate(), UserId::new(1))
            .await
            .unwrap();
        assert_eq!(outcome, MergeOutcome::default());
    }

    #[tokio::test]
    async fn test_merge_is_additive() {
        let ledger = MemoryLedger::new();
        let carts = CartManager::new(&ledger);
        let coordinator = MergeCoordinator::new(&ledger);
        let session_id = SessionId::generate();
        let user_id = UserId::new(2);

        let product = ProductId::new(10);
        let variant = VariantId::new(3);
        let price = Decimal::new(750, 2);

        let session_cart = carts
            .get_or_create(CartOwner::Session(session_id))
            .await
            .unwrap();
        carts
            .add_item(
                session_cart.id,
                NewCartItem::new(product, 2, price).with_variant(variant),
            )
            .await
            .unwrap();

        let account_cart = carts
            .get_or_create(CartOwner::Account(user_id))
            .await
            .unwrap();
        carts
            .add_item(
                account_cart.id,
                NewCartItem::new(product, 3, price).with_variant(variant),
            )
            .await
            .unwrap();

        let outcome = coordinator
            .merge_on_authentication(session_id, user_id)
            .await
            .unwrap();
        assert_eq!(outcome.account_cart, Some(account_cart.id));
        assert_eq!(outcome.archived_cart, Some(session_cart.id));
        assert_eq!(outcome.merged_lines, 1);

        let items = carts.items(account_cart.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);

        // The anonymous cart no longer resolves for the session.
        assert!(
            carts
                .find(CartOwner::Session(session_id))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_merge_is_idempotent() {
        let ledger = MemoryLedger::new();
        let carts = CartManager::new(&ledger);
        let coordinator = MergeCoordinator::new(&ledger);
        let session_id = SessionId::generate();
        let user_id = UserId::new(3);

        let session_cart = carts
            .get_or_create(CartOwner::Session(session_id))
            .await
            .unwrap();
        carts
            .add_item(
                session_cart.id,
                NewCartItem::new(ProductId::new(1), 1, Decimal::new(100, 2)),
            )
            .await
            .unwrap();

        let first = coordinator
            .merge_on_authentication(session_id, user_id)
            .await
            .unwrap();
        let account_cart = first.account_cart.unwrap();
        let after_first = carts.items(account_cart).await.unwrap();

        let second = coordinator
            .merge_on_authentication(session_id, user_id)
            .await
            .unwrap();
        assert_eq!(second, MergeOutcome::default());
        assert_eq!(carts.items(account_cart).await.unwrap(), after_first);
    }
}
