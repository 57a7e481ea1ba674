use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;
use velo_model::{DashboardStats, HomePage};

use crate::domain::services::dashboard_service::DashboardService;
use crate::domain::services::product_service::ProductService;
use crate::error::AppError;
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/home", get(home_page))
        .route("/admin/stats", get(dashboard_stats))
}

async fn home_page(State(state): State<Arc<AppState>>) -> Result<Json<HomePage>, AppError> {
    let home = ProductService::new(state).home_page().await?;

    Ok(Json(home))
}

async fn dashboard_stats(State(state): State<Arc<AppState>>) -> Result<Json<DashboardStats>, AppError> {
    let stats = DashboardService::new(state).stats().await?;

    Ok(Json(stats))
}
