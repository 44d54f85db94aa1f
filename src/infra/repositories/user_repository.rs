//! User repository: lookup and insert of user records.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Email uniqueness is enforced by the implementation at write time:
/// `insert` fails with `AppError::DuplicateIdentity` when the email is taken,
/// even if a preceding `find_by_email` probe saw nothing.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by email address (exact, case-sensitive match)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find all users whose ID is in `ids`; unknown IDs are skipped
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;

    /// Insert a new user
    async fn insert(&self, new_user: NewUser) -> AppResult<User>;
}

/// SeaORM implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let user = new_user.into_user();
        let active_model = ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.to_string()),
            created_at: Set(user.created_at),
        };

        active_model.insert(&self.db).await.map_err(map_insert_error)?;
        Ok(user)
    }
}

/// A unique-index violation on insert means another request registered the
/// same email between our probe and our write.
fn map_insert_error(err: DbErr) -> AppError {
    err.sql_err()
        .and_then(insert_constraint_error)
        .unwrap_or_else(|| AppError::from(err))
}

fn insert_constraint_error(err: SqlErr) -> Option<AppError> {
    match err {
        SqlErr::UniqueConstraintViolation(_) => Some(AppError::DuplicateIdentity),
        _ => None,
    }
}
