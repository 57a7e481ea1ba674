use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use velo_model::{Order, OrderStatus, UserId};

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::repositories::OrderScope;
use crate::domain::services::order_service::OrderService;
use crate::error::AppError;
use crate::server::AppState;

const ADMIN_ROLE: &str = "ADMIN";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_orders))
        .route("/{id}", put(update_order_status))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub role: Option<String>,
    pub user_id: Option<UserId>,
}

impl OrderQuery {
    /// `role=ADMIN` 优先于 `userId`
    pub fn scope(&self) -> Option<OrderScope> {
        if self.role.as_deref() == Some(ADMIN_ROLE) {
            return Some(OrderScope::All);
        }
        self.user_id.map(OrderScope::User)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<OrderQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = OrderService::new(state).list_orders(query.scope()).await?;

    Ok(Json(orders))
}

async fn update_order_status(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    let order = OrderService::new(state).update_status(id, payload.status).await?;

    Ok(Json(order))
}
