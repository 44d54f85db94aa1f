//! Class service - class creation and listing.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Class, ClassDetails, NewClass, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::Store;

/// Class service trait for dependency injection.
#[async_trait]
pub trait ClassService: Send + Sync {
    /// Create a class owned by an existing user
    async fn create_class(&self, new_class: NewClass) -> AppResult<Class>;

    /// List all classes with teacher and students resolved
    async fn list_classes(&self) -> AppResult<Vec<ClassDetails>>;
}

/// Concrete implementation of ClassService over a store.
pub struct ClassManager<S: Store> {
    store: Arc<S>,
}

impl<S: Store> ClassManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: Store + 'static> ClassService for ClassManager<S> {
    async fn create_class(&self, new_class: NewClass) -> AppResult<Class> {
        if new_class.title.trim().is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        if new_class.time_slot.trim().is_empty() {
            return Err(AppError::validation("Time slot is required"));
        }

        if self.store.users().find_by_id(new_class.teacher_id).await?.is_none() {
            return Err(AppError::validation("Teacher not found"));
        }

        let class = self.store.classes().insert(new_class).await?;
        tracing::info!(class_id = %class.id, teacher_id = %class.teacher_id, "Class created");
        Ok(class)
    }

    async fn list_classes(&self) -> AppResult<Vec<ClassDetails>> {
        let classes = self.store.classes().list().await?;

        // One batched lookup for every referenced user
        let referenced: BTreeSet<_> = classes
            .iter()
            .flat_map(|c| std::iter::once(c.teacher_id).chain(c.students.iter().copied()))
            .collect();
        let users: HashMap<_, UserResponse> = self
            .store
            .users()
            .find_by_ids(referenced.into_iter().collect())
            .await?
            .into_iter()
            .map(|u| (u.id, UserResponse::from(u)))
            .collect();

        Ok(classes
            .into_iter()
            .map(|class| ClassDetails {
                id: class.id,
                title: class.title,
                description: class.description,
                teacher: users.get(&class.teacher_id).cloned(),
                time_slot: class.time_slot,
                students: class
                    .students
                    .iter()
                    .filter_map(|id| users.get(id).cloned())
                    .collect(),
            })
            .collect())
    }
}
