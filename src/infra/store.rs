//! Store adapter - the single owner of persistence.
//!
//! Services receive one `Arc<dyn Store>` built at startup and reach every
//! repository through it. Uniqueness and atomicity guarantees live behind
//! this boundary, never in the services.

use async_trait::async_trait;
use std::sync::Arc;

use super::db::Database;
use super::repositories::{ClassRepository, ClassStore, UserRepository, UserStore};
use crate::errors::AppResult;

/// Store trait for dependency injection.
#[async_trait]
pub trait Store: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get class repository
    fn classes(&self) -> Arc<dyn ClassRepository>;

    /// Check that the backing storage answers
    async fn ping(&self) -> AppResult<()>;
}

/// PostgreSQL-backed store (SeaORM)
pub struct Persistence {
    database: Database,
    user_repo: Arc<UserStore>,
    class_repo: Arc<ClassStore>,
}

impl Persistence {
    /// Create the store over an open database
    pub fn new(database: Database) -> Self {
        let user_repo = Arc::new(UserStore::new(database.get_connection()));
        let class_repo = Arc::new(ClassStore::new(database.get_connection()));
        Self {
            database,
            user_repo,
            class_repo,
        }
    }
}

#[async_trait]
impl Store for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn classes(&self) -> Arc<dyn ClassRepository> {
        self.class_repo.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        self.database.ping().await?;
        Ok(())
    }
}
