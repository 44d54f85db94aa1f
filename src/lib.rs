//! Class Scheduler - session credentials and class enrollment.
//!
//! Issues and verifies stateless session tokens for a multi-role scheduling
//! application and guards class enrollment with them.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: `serve` and `migrate`
//! - **config**: environment configuration and constants
//! - **domain**: users, classes, password hashing
//! - **services**: credential, class and enrollment use cases
//! - **infra**: the store adapter (PostgreSQL via SeaORM, or in-memory)
//! - **api**: axum handlers, auth middleware, routes
//! - **errors**: centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server against PostgreSQL
//! cargo run -- serve
//!
//! # Start the server with an in-memory store
//! cargo run -- serve --in-memory
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Class, Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::{MemoryStore, Store};
pub use services::Identity;
