//! HTTP request handlers.

pub mod auth_handler;
pub mod class_handler;

pub use auth_handler::auth_routes;
pub use class_handler::class_routes;
