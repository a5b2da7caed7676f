//! `PostgreSQL` ledger backend.
//!
//! The schema (see `crates/cart/migrations/`) enforces every uniqueness
//! invariant with indexes, so all get-or-create and upsert paths are single
//! `ON CONFLICT` statements - there is no check-then-insert window:
//!
//! - one live cart per owner: partial unique indexes on `session_id` /
//!   `user_id` where `archived = FALSE`
//! - one line per (cart, product, variant): expression unique index with a
//!   `COALESCE` sentinel for the no-variant case
//! - one wishlist per user, one wishlist row per product: plain unique
//!   indexes
//!
//! Queries are built at runtime (`sqlx::query_as`); the ledger's connection
//! is configuration, not a compile-time constant.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use quince_core::{
    CartId, CartItemId, CartOwner, ProductId, SessionId, UserId, VariantId, WishlistId,
    WishlistItemId,
};

use crate::models::{Cart, CartItem, NewCartItem, Wishlist, WishlistItem};

use super::{ItemLedgerStore, StoreError};

/// How many times get-or-create retries when it loses the insert race and
/// the winning row is archived before it can be fetched.
const GET_OR_CREATE_ATTEMPTS: usize = 3;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// An [`ItemLedgerStore`] backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PostgresLedger {
    pool: PgPool,
}

impl PostgresLedger {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    session_id: Option<SessionId>,
    user_id: Option<UserId>,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CartRow> for Cart {
    type Error = StoreError;

    fn try_from(row: CartRow) -> Result<Self, StoreError> {
        let owner = CartOwner::from_columns(row.session_id, row.user_id)?;
        Ok(Self {
            id: row.id,
            owner,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: CartItemId,
    cart_id: CartId,
    product_id: ProductId,
    variant_id: Option<VariantId>,
    quantity: i32,
    unit_price: Decimal,
    metadata: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: row.id,
            cart_id: row.cart_id,
            product_id: row.product_id,
            variant_id: row.variant_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
            metadata: row.metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct WishlistRow {
    id: WishlistId,
    user_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WishlistRow> for Wishlist {
    fn from(row: WishlistRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct WishlistItemRow {
    id: WishlistItemId,
    wishlist_id: WishlistId,
    product_id: ProductId,
    added_at: DateTime<Utc>,
}

impl From<WishlistItemRow> for WishlistItem {
    fn from(row: WishlistItemRow) -> Self {
        Self {
            id: row.id,
            wishlist_id: row.wishlist_id,
            product_id: row.product_id,
            added_at: row.added_at,
        }
    }
}

const CART_COLUMNS: &str = "id, session_id, user_id, archived, created_at, updated_at";
const CART_ITEM_COLUMNS: &str =
    "id, cart_id, product_id, variant_id, quantity, unit_price, metadata, created_at, updated_at";

#[async_trait]
impl ItemLedgerStore for PostgresLedger {
    async fn find_live_cart(&self, owner: CartOwner) -> Result<Option<Cart>, StoreError> {
        let sql = match owner {
            CartOwner::Session(_) => format!(
                "SELECT {CART_COLUMNS} FROM cart WHERE archived = FALSE AND session_id = $1"
            ),
            CartOwner::Account(_) => {
                format!("SELECT {CART_COLUMNS} FROM cart WHERE archived = FALSE AND user_id = $1")
            }
        };
        let query = sqlx::query_as::<_, CartRow>(&sql);
        let row = match owner {
            CartOwner::Session(session_id) => query.bind(session_id),
            CartOwner::Account(user_id) => query.bind(user_id),
        }
        .fetch_optional(&self.pool)
        .await?;

        row.map(Cart::try_from).transpose()
    }

    async fn insert_or_fetch_cart(&self, owner: CartOwner) -> Result<Cart, StoreError> {
        let (session_id, user_id) = owner.into_columns();
        let sql = format!(
            "INSERT INTO cart (session_id, user_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING RETURNING {CART_COLUMNS}"
        );

        // The insert loses to a concurrent creator by returning no row; the
        // follow-up lookup then finds the winner. The loop covers the narrow
        // case where the winner is archived between the two statements.
        for _ in 0..GET_OR_CREATE_ATTEMPTS {
            if let Some(cart) = self.find_live_cart(owner).await? {
                return Ok(cart);
            }
            let inserted = sqlx::query_as::<_, CartRow>(&sql)
                .bind(session_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
            if let Some(row) = inserted {
                return Cart::try_from(row);
            }
        }

        Err(StoreError::Unavailable(
            "cart get-or-create did not converge".to_owned(),
        ))
    }

    async fn fetch_cart(&self, cart_id: CartId) -> Result<Option<Cart>, StoreError> {
        let sql = format!("SELECT {CART_COLUMNS} FROM cart WHERE id = $1");
        let row = sqlx::query_as::<_, CartRow>(&sql)
            .bind(cart_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Cart::try_from).transpose()
    }

    async fn archive_cart(&self, cart_id: CartId) -> Result<(), StoreError> {
        sqlx::query("UPDATE cart SET archived = TRUE, updated_at = NOW() WHERE id = $1 AND archived = FALSE")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn upsert_cart_item(
        &self,
        cart_id: CartId,
        line: NewCartItem,
    ) -> Result<CartItem, StoreError> {
        // Conflict target matches the expression unique index; -1 is the
        // sentinel for "no variant" (the schema requires variant_id >= 1).
        let sql = format!(
            "INSERT INTO cart_item (cart_id, product_id, variant_id, quantity, unit_price, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (cart_id, product_id, COALESCE(variant_id, -1)) \
             DO UPDATE SET quantity = cart_item.quantity + EXCLUDED.quantity, updated_at = NOW() \
             RETURNING {CART_ITEM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CartItemRow>(&sql)
            .bind(cart_id)
            .bind(line.product_id)
            .bind(line.variant_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.metadata)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn fetch_cart_item(&self, item_id: CartItemId) -> Result<Option<CartItem>, StoreError> {
        let sql = format!("SELECT {CART_ITEM_COLUMNS} FROM cart_item WHERE id = $1");
        let row = sqlx::query_as::<_, CartItemRow>(&sql)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(CartItem::from))
    }

    async fn update_item_quantity(
        &self,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE cart_item SET quantity = $1, updated_at = NOW() WHERE id = $2")
                .bind(quantity)
                .bind(item_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_cart_item(&self, item_id: CartItemId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cart_item WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_cart_items(&self, cart_id: CartId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM cart_item WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn cart_items(&self, cart_id: CartId) -> Result<Vec<CartItem>, StoreError> {
        let sql =
            format!("SELECT {CART_ITEM_COLUMNS} FROM cart_item WHERE cart_id = $1 ORDER BY id ASC");
        let rows = sqlx::query_as::<_, CartItemRow>(&sql)
            .bind(cart_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    async fn insert_or_fetch_wishlist(&self, user_id: UserId) -> Result<Wishlist, StoreError> {
        for _ in 0..GET_OR_CREATE_ATTEMPTS {
            if let Some(wishlist) = self.find_wishlist(user_id).await? {
                return Ok(wishlist);
            }
            let inserted = sqlx::query_as::<_, WishlistRow>(
                "INSERT INTO wishlist (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING \
                 RETURNING id, user_id, created_at, updated_at",
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
            if let Some(row) = inserted {
                return Ok(row.into());
            }
        }

        Err(StoreError::Unavailable(
            "wishlist get-or-create did not converge".to_owned(),
        ))
    }

    async fn find_wishlist(&self, user_id: UserId) -> Result<Option<Wishlist>, StoreError> {
        let row = sqlx::query_as::<_, WishlistRow>(
            "SELECT id, user_id, created_at, updated_at FROM wishlist WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Wishlist::from))
    }

    async fn insert_wishlist_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, StoreError> {
        let inserted = sqlx::query(
            "INSERT INTO wishlist_item (wishlist_id, product_id) VALUES ($1, $2) \
             ON CONFLICT (wishlist_id, product_id) DO NOTHING RETURNING id",
        )
        .bind(wishlist_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(inserted.is_some())
    }

    async fn delete_wishlist_item(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM wishlist_item WHERE wishlist_id = $1 AND product_id = $2")
            .bind(wishlist_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn wishlist_item_exists(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT 1 FROM wishlist_item WHERE wishlist_id = $1 AND product_id = $2",
        )
        .bind(wishlist_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    async fn wishlist_items(
        &self,
        wishlist_id: WishlistId,
    ) -> Result<Vec<WishlistItem>, StoreError> {
        let rows = sqlx::query_as::<_, WishlistItemRow>(
            "SELECT id, wishlist_id, product_id, added_at FROM wishlist_item \
             WHERE wishlist_id = $1 ORDER BY id ASC",
        )
        .bind(wishlist_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(WishlistItem::from).collect())
    }

    async fn delete_wishlist_items(&self, wishlist_id: WishlistId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM wishlist_item WHERE wishlist_id = $1")
            .bind(wishlist_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
