pub mod user;
pub mod product;
pub mod cart;
pub mod session;
