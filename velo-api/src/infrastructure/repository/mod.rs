mod mysql_order_repository;
mod mysql_product_repository;
mod mysql_user_repository;

pub use mysql_order_repository::MySqlOrderRepository;
pub use mysql_product_repository::MySqlProductRepository;
pub use mysql_user_repository::MySqlUserRepository;
