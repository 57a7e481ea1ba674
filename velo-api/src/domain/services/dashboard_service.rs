use std::sync::Arc;

use velo_model::{DashboardStats, OrderStatus};

use crate::error::AppError;
use crate::server::AppState;

/// 后台首页展示的最近订单数
const RECENT_ORDERS_LIMIT: u32 = 5;

pub struct DashboardService {
    state: Arc<AppState>,
}

impl DashboardService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let state = &self.state;

        Ok(DashboardStats {
            total_products: state.products.count(None).await?,
            total_orders: state.orders.count(None).await?,
            total_users: state.users.count().await?,
            pending_orders: state.orders.count(Some(OrderStatus::Pending)).await?,
            total_revenue: state.orders.total_revenue().await?,
            recent_orders: state.orders.recent(RECENT_ORDERS_LIMIT).await?,
        })
    }
}
