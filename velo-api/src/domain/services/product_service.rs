use std::sync::Arc;

use strum::IntoEnumIterator;
use velo_model::{Category, CategoryCounts, HomePage, NewProduct, Product, ProductId, ProductPatch};

use crate::error::AppError;
use crate::server::AppState;

/// 首页置顶商品数量
const HOME_PINNED_LIMIT: u32 = 4;
/// 首页最新商品数量
const HOME_RECENT_LIMIT: u32 = 8;

pub struct ProductService {
    state: Arc<AppState>,
}

impl ProductService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list_products(&self, category: Option<Category>) -> Result<Vec<Product>, AppError> {
        self.state.products.list(category).await
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, AppError> {
        self.state
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found", id)))
    }

    pub async fn create_product(&self, form: &NewProduct) -> Result<Product, AppError> {
        let id = self.state.products.insert(form).await?;
        let product = self.get_product(id).await?;

        tracing::info!(product_id = product.id, name = %product.name, "product created");

        Ok(product)
    }

    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product, AppError> {
        // 检查产品是否存在
        let mut product = self.get_product(id).await?;

        if patch.is_empty() {
            return Ok(product);
        }

        patch.apply_to(&mut product);
        // 读取之后行可能已被删除
        if !self.state.products.update(&product).await? {
            return Err(AppError::NotFound(format!("Product with ID {} not found", id)));
        }

        tracing::info!(product_id = id, "product updated");

        Ok(product)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), AppError> {
        if !self.state.products.delete(id).await? {
            return Err(AppError::NotFound(format!("Product with ID {} not found", id)));
        }

        tracing::info!(product_id = id, "product deleted");

        Ok(())
    }

    pub async fn home_page(&self) -> Result<HomePage, AppError> {
        let products = &self.state.products;

        let pinned = products.list_by_pinned(true, HOME_PINNED_LIMIT).await?;
        let recent = products.list_by_pinned(false, HOME_RECENT_LIMIT).await?;

        let mut category_counts = CategoryCounts::default();
        for category in Category::iter() {
            category_counts.set(category, products.count(Some(category)).await?);
        }
        let total_products = products.count(None).await?;

        Ok(HomePage {
            pinned,
            recent,
            category_counts,
            total_products,
        })
    }
}
