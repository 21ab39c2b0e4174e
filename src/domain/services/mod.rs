pub mod credential_service;
pub mod catalog_service;
pub mod cart_service;
pub mod session_service;
