use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use velo_model::{Category, NewProduct, Product, ProductId};

use crate::domain::repositories::ProductRepository;
use crate::error::AppError;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image, category, stock, is_pinned, created_at";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: Decimal,
    image: String,
    category: String,
    stock: i32,
    is_pinned: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category = Category::from_str(&row.category).map_err(|_| {
            AppError::Internal(format!("Product {} has unknown category {:?}", row.id, row.category))
        })?;

        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image: row.image,
            category,
            stock: row.stock,
            is_pinned: row.is_pinned,
            created_at: row.created_at,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, AppError> {
    rows.into_iter().map(Product::try_from).collect()
}

pub struct MySqlProductRepository {
    pool: MySqlPool,
}

impl MySqlProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn list(&self, category: Option<Category>) -> Result<Vec<Product>, AppError> {
        let mut query: QueryBuilder<'_, MySql> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));

        if let Some(category) = category {
            query.push(" WHERE category = ").push_bind(category.to_string());
        }
        query.push(" ORDER BY is_pinned DESC, created_at DESC");

        let rows = query
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;

        into_products(rows)
    }

    async fn list_by_pinned(&self, pinned: bool, limit: u32) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_pinned = ? ORDER BY created_at DESC LIMIT ?"
        ))
            .bind(pinned)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        into_products(rows)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    async fn insert(&self, product: &NewProduct) -> Result<ProductId, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price, image, category, stock, is_pinned, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.image)
            .bind(product.category.as_ref())
            .bind(product.stock)
            .bind(product.is_pinned)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        let id = ProductId::try_from(result.last_insert_id())
            .map_err(|e| AppError::Internal(format!("Product id out of range: {}", e)))?;

        Ok(id)
    }

    async fn update(&self, product: &Product) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?, image = ?, category = ?, stock = ?, is_pinned = ?
            WHERE id = ?
            "#,
        )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.image)
            .bind(product.category.as_ref())
            .bind(product.stock)
            .bind(product.is_pinned)
            .bind(product.id)
            .execute(&self.pool)
            .await?;

        // 连接默认带 CLIENT_FOUND_ROWS，值没变也算命中
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // 仍被订单明细引用
                if let sqlx::Error::Database(db) = &e {
                    if db.is_foreign_key_violation() {
                        return AppError::Conflict(format!("Product {} is referenced by existing orders", id));
                    }
                }
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, category: Option<Category>) -> Result<i64, AppError> {
        let count = match category {
            Some(category) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE category = ?")
                    .bind(category.as_ref())
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }
}
