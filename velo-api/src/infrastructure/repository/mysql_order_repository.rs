use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use velo_model::{Order, OrderItem, OrderStatus, ProductRef, UserSummary};

use crate::domain::repositories::{OrderRepository, OrderScope};
use crate::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    order_number: String,
    total: Decimal,
    status: String,
    payment_method: String,
    created_at: DateTime<Utc>,
    user_id: i64,
    user_name: Option<String>,
    user_email: Option<String>,
}

impl OrderRow {
    fn into_order(self, with_user: bool) -> Result<Order, AppError> {
        let status = OrderStatus::from_str(&self.status).map_err(|_| {
            AppError::Internal(format!("Order {} has unknown status {:?}", self.id, self.status))
        })?;

        let user = match (with_user, self.user_name, self.user_email) {
            (true, Some(name), Some(email)) => Some(UserSummary { id: self.user_id, name, email }),
            _ => None,
        };

        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            total: self.total,
            status,
            payment_method: self.payment_method,
            created_at: self.created_at,
            user_id: self.user_id,
            user,
            items: Vec::new(),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: i64,
    quantity: i32,
    price: Decimal,
    product_id: i64,
    product_name: String,
}

pub struct MySqlOrderRepository {
    pool: MySqlPool,
}

impl MySqlOrderRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn select_orders() -> QueryBuilder<'static, MySql> {
        QueryBuilder::new(
            r#"
            SELECT o.id, o.order_number, o.total, o.status, o.payment_method, o.created_at, o.user_id,
                   u.name AS user_name, u.email AS user_email
            FROM orders o
            LEFT JOIN users u ON u.id = o.user_id
            "#,
        )
    }

    /// 一次查出这些订单的全部明细，再按订单归位
    async fn attach_items(&self, orders: &mut [Order]) -> Result<(), AppError> {
        if orders.is_empty() {
            return Ok(());
        }

        let mut query: QueryBuilder<'_, MySql> = QueryBuilder::new(
            r#"
            SELECT oi.order_id, oi.quantity, oi.price, p.id AS product_id, p.name AS product_name
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id IN (
            "#,
        );
        let mut ids = query.separated(", ");
        for order in orders.iter() {
            ids.push_bind(order.id);
        }
        ids.push_unseparated(") ORDER BY oi.order_id, oi.id");

        let rows = query
            .build_query_as::<OrderItemRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut items: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            items.entry(row.order_id).or_default().push(OrderItem {
                quantity: row.quantity,
                price: row.price,
                product: ProductRef { id: row.product_id, name: row.product_name },
            });
        }

        for order in orders.iter_mut() {
            order.items = items.remove(&order.id).unwrap_or_default();
        }

        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn list(&self, scope: OrderScope) -> Result<Vec<Order>, AppError> {
        let mut query = Self::select_orders();
        if let OrderScope::User(user_id) = scope {
            query.push(" WHERE o.user_id = ").push_bind(user_id);
        }
        query.push(" ORDER BY o.created_at DESC");

        let with_user = scope == OrderScope::All;
        let mut orders = query
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| row.into_order(with_user))
            .collect::<Result<Vec<_>, _>>()?;

        self.attach_items(&mut orders).await?;

        Ok(orders)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, AppError> {
        let mut query = Self::select_orders();
        query.push(" WHERE o.id = ").push_bind(id);

        let row = query
            .build_query_as::<OrderRow>()
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut orders = vec![row.into_order(true)?];
        self.attach_items(&mut orders).await?;

        Ok(orders.pop())
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> Result<bool, AppError> {
        // 状态相同时 rows_affected 为 0，所以先确认订单存在
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?
            > 0;

        if !exists {
            return Ok(false);
        }

        sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status.as_ref())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }

    async fn count(&self, status: Option<OrderStatus>) -> Result<i64, AppError> {
        let count = match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = ?")
                    .bind(status.as_ref())
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    async fn total_revenue(&self) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>("SELECT COALESCE(SUM(total), 0) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<Order>, AppError> {
        let mut query = Self::select_orders();
        query.push(" ORDER BY o.created_at DESC LIMIT ").push_bind(limit);

        query
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| row.into_order(true))
            .collect()
    }
}
