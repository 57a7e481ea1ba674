use rust_decimal::Decimal;
use velo_model::{Category, CategoryCounts, Product, Subcategory};

use crate::api::ShopClient;
use crate::error::ClientError;
use crate::filter::{CategoryFilter, FilterState, PriceRange, SortOrder, SubcategoryFilter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// 商店页：全部商品只拉一次，筛选在本地完成
#[derive(Debug)]
pub struct ShopPage {
    client: ShopClient,
    state: LoadState,
    products: Vec<Product>,
    filters: FilterState,
    visible: Vec<Product>,
}

impl ShopPage {
    pub fn new(client: ShopClient) -> Self {
        Self {
            client,
            state: LoadState::Loading,
            products: Vec::new(),
            filters: FilterState::default(),
            visible: Vec::new(),
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.state = LoadState::Loading;

        match self.client.list_products(None).await {
            Ok(products) => {
                self.set_products(products);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load products");
                self.state = LoadState::Failed(e.user_message());
                Err(e)
            }
        }
    }

    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.state = LoadState::Ready;
        self.recompute();
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// 加载完成前返回 `None`；加载完但没有匹配的商品时是空切片
    pub fn visible(&self) -> Option<&[Product]> {
        match self.state {
            LoadState::Ready => Some(self.visible.as_slice()),
            _ => None,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// 修改任意筛选条件后都会重新计算
    pub fn update_filters(&mut self, f: impl FnOnce(&mut FilterState)) {
        f(&mut self.filters);
        self.recompute();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        self.update_filters(|filters| filters.search = search);
    }

    pub fn select_category(&mut self, category: CategoryFilter) {
        self.update_filters(|filters| filters.select_category(category));
    }

    pub fn select_subcategory(&mut self, subcategory: SubcategoryFilter) {
        self.update_filters(|filters| filters.subcategory = subcategory);
    }

    pub fn set_price_range(&mut self, min: Decimal, max: Decimal) {
        self.update_filters(|filters| filters.price = PriceRange { min, max });
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.update_filters(|filters| filters.sort = sort);
    }

    pub fn set_in_stock_only(&mut self, in_stock_only: bool) {
        self.update_filters(|filters| filters.in_stock_only = in_stock_only);
    }

    pub fn reset_filters(&mut self) {
        self.update_filters(FilterState::reset);
    }

    /// 当前大类下可选的子分类
    pub fn subcategory_options(&self) -> &'static [Subcategory] {
        match self.filters.category {
            CategoryFilter::All => &[],
            CategoryFilter::Only(category) => category.subcategories(),
        }
    }

    /// 按已加载商品统计，不受筛选影响
    pub fn category_counts(&self) -> CategoryCounts {
        CategoryCounts::tally(&self.products)
    }

    pub fn category_count(&self, category: Category) -> i64 {
        self.category_counts().get(category)
    }

    pub fn total_count(&self) -> usize {
        self.products.len()
    }

    fn recompute(&mut self) {
        self.visible = self.filters.apply(&self.products);
    }
}
