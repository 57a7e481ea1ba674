use async_trait::async_trait;
use rust_decimal::Decimal;
use velo_model::{Order, OrderStatus, UserId};

use crate::error::AppError;

/// 订单列表的查询范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// 后台：全部订单，带下单用户
    All,
    /// 某个用户自己的订单
    User(UserId),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 按创建时间倒序，带明细
    async fn list(&self, scope: OrderScope) -> Result<Vec<Order>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, AppError>;

    /// 返回订单是否存在
    async fn update_status(&self, id: i64, status: OrderStatus) -> Result<bool, AppError>;

    async fn count(&self, status: Option<OrderStatus>) -> Result<i64, AppError>;

    async fn total_revenue(&self) -> Result<Decimal, AppError>;

    /// 最近的订单，只带下单用户，不带明细
    async fn recent(&self, limit: u32) -> Result<Vec<Order>, AppError>;
}
