use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// 订单列表里附带的下单用户信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}
