use axum::{routing::get, Router};
use sqlx::MySqlPool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::{orders, products, storefront};
use crate::config::Config;
use crate::domain::repositories::{OrderRepository, ProductRepository, UserRepository};
use crate::error::AppError;
use crate::infrastructure::repository::{MySqlOrderRepository, MySqlProductRepository, MySqlUserRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(config: Config, db: MySqlPool) -> Self {
        Self {
            config,
            products: Arc::new(MySqlProductRepository::new(db.clone())),
            orders: Arc::new(MySqlOrderRepository::new(db.clone())),
            users: Arc::new(MySqlUserRepository::new(db)),
        }
    }
}

pub async fn create_app(state: AppState) -> Result<Router, AppError> {
    let app_state = Arc::new(state);

    // 健康检查路由
    let health_route = Router::new()
        .route("/health", get(|| async { "OK" }));

    // API 路由
    let api_routes = Router::new()
        .nest("/products", products::routes())
        .nest("/orders", orders::routes())
        .merge(storefront::routes());

    // 组合所有路由
    let app = Router::new()
        .nest("/api", api_routes)
        .merge(health_route)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state);

    Ok(app)
}
