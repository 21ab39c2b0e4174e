pub mod sqlite_user_repo;
pub mod sqlite_product_repo;

pub mod postgres_user_repo;
pub mod postgres_product_repo;

pub mod memory_session_repo;
