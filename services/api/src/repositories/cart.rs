//! Cart repository: one document-style row per user, with the item
//! lines stored as a JSONB array and replaced wholesale on every write.

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow, types::Json};
use uuid::Uuid;

use crate::models::{Cart, CartItem};

/// Cart repository
#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    /// Create a new cart repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user's cart
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, items, total_price, version, updated_at
            FROM carts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(cart_from_row))
    }

    /// Insert-or-replace keyed by user id, guarded by the version stamp.
    ///
    /// A cart loaded at version N only replaces a stored cart that is
    /// still at version N; a fresh cart (version 0) only inserts when no
    /// row exists yet. Returns `None` when a concurrent writer got there
    /// first; the caller decides how to surface that, nothing is retried
    /// here.
    pub async fn upsert(&self, cart: &Cart) -> Result<Option<Cart>> {
        let row = if cart.version == 0 {
            sqlx::query(
                r#"
                INSERT INTO carts (id, user_id, items, total_price, version, updated_at)
                VALUES ($1, $2, $3, $4, 1, NOW())
                ON CONFLICT (user_id) DO NOTHING
                RETURNING id, user_id, items, total_price, version, updated_at
                "#,
            )
            .bind(cart.id)
            .bind(cart.user_id)
            .bind(Json(&cart.items))
            .bind(cart.total_price)
            .fetch_optional(&self.pool)
            .await?
        } else {
            sqlx::query(
                r#"
                UPDATE carts
                SET items = $2, total_price = $3, version = version + 1, updated_at = NOW()
                WHERE user_id = $1 AND version = $4
                RETURNING id, user_id, items, total_price, version, updated_at
                "#,
            )
            .bind(cart.user_id)
            .bind(Json(&cart.items))
            .bind(cart.total_price)
            .bind(cart.version)
            .fetch_optional(&self.pool)
            .await?
        };

        Ok(row.as_ref().map(cart_from_row))
    }

    /// Delete a user's cart. Returns whether a record existed.
    pub async fn delete(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM carts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn cart_from_row(row: &PgRow) -> Cart {
    let Json(items): Json<Vec<CartItem>> = row.get("items");
    Cart {
        id: row.get("id"),
        user_id: row.get("user_id"),
        items,
        total_price: row.get("total_price"),
        version: row.get("version"),
        updated_at: row.get("updated_at"),
    }
}
