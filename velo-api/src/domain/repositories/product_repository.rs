use async_trait::async_trait;
use velo_model::{Category, NewProduct, Product, ProductId};

use crate::error::AppError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 置顶商品在前，其次按创建时间倒序
    async fn list(&self, category: Option<Category>) -> Result<Vec<Product>, AppError>;

    /// 按置顶标记筛选，按创建时间倒序取前 `limit` 条
    async fn list_by_pinned(&self, pinned: bool, limit: u32) -> Result<Vec<Product>, AppError>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, AppError>;

    async fn insert(&self, product: &NewProduct) -> Result<ProductId, AppError>;

    /// 返回是否找到这一行
    async fn update(&self, product: &Product) -> Result<bool, AppError>;

    /// 返回是否真的删除了一行
    async fn delete(&self, id: ProductId) -> Result<bool, AppError>;

    async fn count(&self, category: Option<Category>) -> Result<i64, AppError>;
}
