//! Enrollment service - adds the calling student to a class.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::Identity;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::Store;

/// Enrollment service trait for dependency injection.
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Add the verified caller to the class membership.
    ///
    /// Fails with `NotFound` for an unknown class and `AlreadyEnrolled`
    /// when the caller is already a member; on any error the membership is
    /// left as it was.
    async fn enroll(&self, caller: &Identity, class_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of EnrollmentService over a store.
pub struct Enroller<S: Store> {
    store: Arc<S>,
}

impl<S: Store> Enroller<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: Store + 'static> EnrollmentService for Enroller<S> {
    async fn enroll(&self, caller: &Identity, class_id: Uuid) -> AppResult<()> {
        let classes = self.store.classes();
        let class = classes.find_by_id(class_id).await?.ok_or_not_found()?;

        if class.is_enrolled(caller.user_id) {
            return Err(AppError::AlreadyEnrolled);
        }

        // The snapshot above may be stale; the store decides atomically
        if !classes.atomic_add_member(class_id, caller.user_id).await? {
            return Err(AppError::AlreadyEnrolled);
        }

        tracing::info!(user_id = %caller.user_id, class_id = %class_id, "Student enrolled");
        Ok(())
    }
}
