use std::sync::Arc;

use velo_model::{Order, OrderStatus};

use crate::domain::repositories::OrderScope;
use crate::error::AppError;
use crate::server::AppState;

pub struct OrderService {
    state: Arc<AppState>,
}

impl OrderService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// 没有查询范围时返回空列表
    pub async fn list_orders(&self, scope: Option<OrderScope>) -> Result<Vec<Order>, AppError> {
        match scope {
            Some(scope) => self.state.orders.list(scope).await,
            None => Ok(Vec::new()),
        }
    }

    /// 任意状态之间都可以切换
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order, AppError> {
        if !self.state.orders.update_status(id, status).await? {
            return Err(AppError::NotFound(format!("Order with ID {} not found", id)));
        }

        tracing::info!(order_id = id, status = %status, "order status updated");

        self.state
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order with ID {} not found", id)))
    }
}
