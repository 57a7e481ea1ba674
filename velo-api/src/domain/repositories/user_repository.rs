use async_trait::async_trait;

use crate::error::AppError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn count(&self) -> Result<i64, AppError>;
}
