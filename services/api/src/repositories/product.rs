//! Product repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::{NewProduct, Product};

/// Product repository
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the whole catalog in insertion order
    pub async fn all(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, category, image_url, in_stock, created_at
            FROM products
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    /// Get products in a category. The label is matched exactly.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, category, image_url, in_stock, created_at
            FROM products
            WHERE category = $1
            ORDER BY created_at
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    /// Find a product by ID
    pub async fn by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, category, image_url, in_stock, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(product_from_row))
    }

    /// Count all products
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Insert a new product
    pub async fn insert(&self, new_product: &NewProduct) -> Result<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, category, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, category, image_url, in_stock, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_product.name)
        .bind(&new_product.description)
        .bind(new_product.price)
        .bind(&new_product.category)
        .bind(&new_product.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(product_from_row(&row))
    }
}

fn product_from_row(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        category: row.get("category"),
        image_url: row.get("image_url"),
        in_stock: row.get("in_stock"),
        created_at: row.get("created_at"),
    }
}
