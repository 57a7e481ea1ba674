//! GO Velo 商店的 HTTP 服务：商品目录、订单后台、首页和后台统计。

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod server;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{create_app, AppState};
