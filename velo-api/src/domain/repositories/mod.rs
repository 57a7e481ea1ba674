mod order_repository;
mod product_repository;
mod user_repository;

pub use order_repository::{OrderRepository, OrderScope};
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
