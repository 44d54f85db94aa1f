//! In-process store for `serve --in-memory` and tests.
//!
//! Each repository keeps its records behind one `RwLock`; every check-and-write
//! happens under a single write guard, which gives the same guarantees as the
//! unique index and `ON CONFLICT DO NOTHING` of the SQL store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repositories::{ClassRepository, UserRepository};
use super::store::Store;
use crate::domain::{Class, NewClass, NewUser, User};
use crate::errors::{AppError, AppResult};

#[derive(Default)]
struct UserTable {
    by_id: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

/// In-memory users
#[derive(Default)]
pub struct MemoryUsers {
    table: RwLock<UserTable>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .by_email
            .get(email)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.table.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        let table = self.table.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| table.by_id.get(id))
            .cloned()
            .collect())
    }

    async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let mut table = self.table.write().await;
        if table.by_email.contains_key(&new_user.email) {
            return Err(AppError::DuplicateIdentity);
        }

        let user = new_user.into_user();
        table.by_email.insert(user.email.clone(), user.id);
        table.by_id.insert(user.id, user.clone());
        Ok(user)
    }
}

/// In-memory classes
#[derive(Default)]
pub struct MemoryClasses {
    classes: RwLock<HashMap<Uuid, Class>>,
}

#[async_trait]
impl ClassRepository for MemoryClasses {
    async fn insert(&self, new_class: NewClass) -> AppResult<Class> {
        let class = new_class.into_class();
        self.classes.write().await.insert(class.id, class.clone());
        Ok(class)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Class>> {
        Ok(self.classes.read().await.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Class>> {
        let mut classes: Vec<Class> = self.classes.read().await.values().cloned().collect();
        classes.sort_by_key(|c| c.created_at);
        Ok(classes)
    }

    async fn atomic_add_member(&self, class_id: Uuid, student_id: Uuid) -> AppResult<bool> {
        let mut classes = self.classes.write().await;
        let class = classes.get_mut(&class_id).ok_or(AppError::NotFound)?;
        Ok(class.students.insert(student_id))
    }
}

/// Store holding everything in process memory
#[derive(Default, Clone)]
pub struct MemoryStore {
    users: Arc<MemoryUsers>,
    classes: Arc<MemoryClasses>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn classes(&self) -> Arc<dyn ClassRepository> {
        self.classes.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
