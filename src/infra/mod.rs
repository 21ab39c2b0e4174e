pub mod blob;
pub mod factory;
pub mod repositories;
