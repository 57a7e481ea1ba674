use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use velo_model::{Category, NewProduct, Product, ProductId, ProductPatch};

use crate::api::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::domain::services::product_service::ProductService;
use crate::error::AppError;
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product).put(update_product).delete(delete_product))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

impl ProductQuery {
    /// 空字符串等同于不筛选；未知分类直接拒绝
    pub fn category(&self) -> Result<Option<Category>, AppError> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Category::from_str(value)
                .map(Some)
                .map_err(|_| AppError::BadRequest(format!("Unknown category: {}", value))),
        }
    }
}

async fn list_products(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let category = query.category()?;

    let products = ProductService::new(state).list_products(category).await?;

    Ok(Json(products))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::new(state).get_product(id).await?;

    Ok(Json(product))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<NewProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = ProductService::new(state).create_product(&payload).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<ProductId>,
    ValidatedJson(payload): ValidatedJson<ProductPatch>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::new(state).update_product(id, payload).await?;

    Ok(Json(product))
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Value>, AppError> {
    ProductService::new(state).delete_product(id).await?;

    Ok(Json(json!({ "success": true })))
}
