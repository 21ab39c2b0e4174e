pub mod auth;
pub mod cart;
pub mod health;
pub mod product;
