//! 商店共享的领域类型：商品、订单、用户以及首页/后台的只读模型。

pub mod order;
pub mod product;
pub mod stats;
pub mod user;

pub use order::{Order, OrderItem, OrderStatus, ProductRef};
pub use product::{Category, NewProduct, Product, ProductId, ProductPatch, Subcategory};
pub use stats::{CategoryCounts, DashboardStats, HomePage};
pub use user::{UserId, UserSummary};
