//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations (PostgreSQL via SeaORM)
//! - Repositories for users and classes
//! - The `Store` adapter the services depend on, with a SQL and an
//!   in-memory implementation

pub mod db;
pub mod memory;
pub mod repositories;
pub mod store;

pub use db::{Database, Migrator};
pub use memory::MemoryStore;
pub use repositories::{ClassRepository, ClassStore, UserRepository, UserStore};
pub use store::{Persistence, Store};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockClassRepository, MockUserRepository};
