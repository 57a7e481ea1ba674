//! 各个页面的状态，和具体的界面框架无关。

pub mod admin_orders;
pub mod admin_products;
pub mod cart;
pub mod in_flight;
pub mod shop;

pub use admin_orders::OrderAdmin;
pub use admin_products::{Confirm, ProductAdmin};
pub use cart::{CartBadge, ProductCard};
pub use in_flight::InFlight;
pub use shop::{LoadState, ShopPage};
