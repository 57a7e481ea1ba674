//! 商店页的商品筛选。
//!
//! 结果只取决于商品列表和 [`FilterState`]：先依次过滤，最后排序一次。

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use velo_model::{Category, Product, Subcategory};

/// 价格筛选的默认上限
pub const DEFAULT_PRICE_MAX: Decimal = Decimal::from_parts(10000, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubcategoryFilter {
    #[default]
    All,
    Only(Subcategory),
}

/// 闭区间 `[min, max]`，不检查 `min <= max`，反过来的区间什么都匹配不到
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Decimal::ZERO,
            max: DEFAULT_PRICE_MAX,
        }
    }
}

impl PriceRange {
    /// 不限价格
    pub fn unbounded() -> Self {
        Self {
            min: Decimal::MIN,
            max: Decimal::MAX,
        }
    }

    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    Name,
    Featured,
}

impl SortOrder {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::Newest => b.created_at.cmp(&a.created_at),
            SortOrder::Oldest => a.created_at.cmp(&b.created_at),
            SortOrder::PriceAsc => a.price.cmp(&b.price),
            SortOrder::PriceDesc => b.price.cmp(&a.price),
            SortOrder::Name => a.name.cmp(&b.name),
            SortOrder::Featured => b.is_pinned.cmp(&a.is_pinned),
        }
    }

    /// 稳定排序，相等的元素保持原来的顺序
    pub fn sort(self, products: &mut [Product]) {
        products.sort_by(|a, b| self.compare(a, b));
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub category: CategoryFilter,
    pub subcategory: SubcategoryFilter,
    pub price: PriceRange,
    pub sort: SortOrder,
    pub in_stock_only: bool,
}

impl FilterState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 换大类时子分类回到“全部”
    pub fn select_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.subcategory = SubcategoryFilter::All;
    }

    pub fn matches(&self, product: &Product) -> bool {
        Predicates::new(self).matches(product)
    }

    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let predicates = Predicates::new(self);
        let mut visible: Vec<Product> = products
            .iter()
            .filter(|product| predicates.matches(product))
            .cloned()
            .collect();

        self.sort.sort(&mut visible);
        visible
    }
}

/// 关键字只转一次小写
struct Predicates<'a> {
    state: &'a FilterState,
    subcategory: Option<String>,
    search: Option<String>,
}

impl<'a> Predicates<'a> {
    fn new(state: &'a FilterState) -> Self {
        let subcategory = match state.subcategory {
            SubcategoryFilter::All => None,
            SubcategoryFilter::Only(sub) => Some(sub.keyword()),
        };
        // 只有空串算“不搜索”，空白原样参与匹配
        let search = Some(state.search.to_lowercase()).filter(|s| !s.is_empty());

        Self {
            state,
            subcategory,
            search,
        }
    }

    fn matches(&self, product: &Product) -> bool {
        if let CategoryFilter::Only(category) = self.state.category {
            if product.category != category {
                return false;
            }
        }
        if let Some(keyword) = &self.subcategory {
            if !product.mentions(keyword) {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            if !product.mentions(needle) {
                return false;
            }
        }
        if !self.state.price.contains(product.price) {
            return false;
        }
        !self.state.in_stock_only || product.in_stock()
    }
}
