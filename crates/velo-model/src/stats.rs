use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::Order;
use crate::product::{Category, Product};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub bicyclettes: i64,
    #[serde(rename = "pièces")]
    pub pieces: i64,
    pub accessoires: i64,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> i64 {
        match category {
            Category::Bicyclettes => self.bicyclettes,
            Category::Pieces => self.pieces,
            Category::Accessoires => self.accessoires,
        }
    }

    pub fn set(&mut self, category: Category, count: i64) {
        match category {
            Category::Bicyclettes => self.bicyclettes = count,
            Category::Pieces => self.pieces = count,
            Category::Accessoires => self.accessoires = count,
        }
    }

    /// 按已加载的商品统计
    pub fn tally<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let mut counts = Self::default();
        for product in products {
            counts.set(product.category, counts.get(product.category) + 1);
        }
        counts
    }
}

/// 首页数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub pinned: Vec<Product>,
    pub recent: Vec<Product>,
    pub category_counts: CategoryCounts,
    pub total_products: i64,
}

/// 后台首页统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_orders: i64,
    pub total_users: i64,
    pub pending_orders: i64,
    pub total_revenue: Decimal,
    pub recent_orders: Vec<Order>,
}
