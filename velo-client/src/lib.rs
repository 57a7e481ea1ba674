//! GO Velo 商店前端逻辑的 Rust 实现：商店页筛选、后台商品/订单管理、购物车角标。
//!
//! 所有网络请求都通过 [`ShopClient`] 发往 `velo-api`。

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod mutation;
pub mod screens;
pub mod session;

pub use api::{OrderListing, ShopClient};
pub use config::ClientConfig;
pub use error::ClientError;
pub use filter::{CategoryFilter, FilterState, PriceRange, SortOrder, SubcategoryFilter};
pub use mutation::{mutate, MutationOutcome};
pub use screens::{CartBadge, Confirm, OrderAdmin, ProductAdmin, ProductCard, ShopPage};
pub use session::Session;
