pub mod extract;
pub mod orders;
pub mod products;
pub mod storefront;
