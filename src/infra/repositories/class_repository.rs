//! Class repository: class records and their membership sets.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::class::{self, ActiveModel as ClassActiveModel, Entity as ClassEntity};
use super::entities::enrollment::{self, ActiveModel as EnrollmentActiveModel, Entity as EnrollmentEntity};
use crate::domain::{Class, NewClass};
use crate::errors::{AppError, AppResult};
use crate::infra::db::migrations::{CLASS_FOREIGN_KEY, STUDENT_FOREIGN_KEY};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Class repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ClassRepository: Send + Sync {
    /// Insert a new class with an empty membership set
    async fn insert(&self, new_class: NewClass) -> AppResult<Class>;

    /// Find class by ID, membership included
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Class>>;

    /// List all classes, membership included, oldest first
    async fn list(&self) -> AppResult<Vec<Class>>;

    /// Add `student_id` to the class membership if it is not already there.
    ///
    /// The check and the add are one atomic operation. Returns `true` when
    /// the student was added and `false` when already present. Fails with
    /// `AppError::NotFound` if the class does not exist.
    async fn atomic_add_member(&self, class_id: Uuid, student_id: Uuid) -> AppResult<bool>;
}

/// SeaORM implementation of ClassRepository
pub struct ClassStore {
    db: DatabaseConnection,
}

impl ClassStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn members_of(&self, class_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, BTreeSet<Uuid>>> {
        let rows = EnrollmentEntity::find()
            .filter(enrollment::Column::ClassId.is_in(class_ids))
            .all(&self.db)
            .await?;

        let mut members: HashMap<Uuid, BTreeSet<Uuid>> = HashMap::new();
        for row in rows {
            members.entry(row.class_id).or_default().insert(row.student_id);
        }
        Ok(members)
    }
}

fn into_domain(model: class::Model, students: BTreeSet<Uuid>) -> Class {
    Class {
        id: model.id,
        title: model.title,
        description: model.description,
        teacher_id: model.teacher_id,
        time_slot: model.time_slot,
        students,
        created_at: model.created_at,
    }
}

#[async_trait]
impl ClassRepository for ClassStore {
    async fn insert(&self, new_class: NewClass) -> AppResult<Class> {
        let class = new_class.into_class();
        let active_model = ClassActiveModel {
            id: Set(class.id),
            title: Set(class.title.clone()),
            description: Set(class.description.clone()),
            teacher_id: Set(class.teacher_id),
            time_slot: Set(class.time_slot.clone()),
            created_at: Set(class.created_at),
        };

        active_model.insert(&self.db).await?;
        Ok(class)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Class>> {
        let Some(model) = ClassEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let students = self.members_of(vec![id]).await?.remove(&id).unwrap_or_default();
        Ok(Some(into_domain(model, students)))
    }

    async fn list(&self) -> AppResult<Vec<Class>> {
        let models = ClassEntity::find()
            .order_by_asc(class::Column::CreatedAt)
            .all(&self.db)
            .await?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        let mut members = self.members_of(models.iter().map(|m| m.id).collect()).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let students = members.remove(&m.id).unwrap_or_default();
                into_domain(m, students)
            })
            .collect())
    }

    async fn atomic_add_member(&self, class_id: Uuid, student_id: Uuid) -> AppResult<bool> {
        let row = EnrollmentActiveModel {
            class_id: Set(class_id),
            student_id: Set(student_id),
            enrolled_at: Set(chrono::Utc::now()),
        };

        // INSERT ... ON CONFLICT DO NOTHING: zero rows means already a member
        let inserted = EnrollmentEntity::insert(row)
            .on_conflict(
                OnConflict::columns([enrollment::Column::ClassId, enrollment::Column::StudentId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(map_enroll_error)?;

        Ok(inserted == 1)
    }
}

fn map_enroll_error(err: DbErr) -> AppError {
    err.sql_err()
        .and_then(enroll_constraint_error)
        .unwrap_or_else(|| AppError::from(err))
}

/// The class or the student row can vanish between lookup and insert; the
/// violated foreign key tells which one.
fn enroll_constraint_error(err: SqlErr) -> Option<AppError> {
    match err {
        SqlErr::ForeignKeyConstraintViolation(msg) if msg.contains(CLASS_FOREIGN_KEY) => {
            Some(AppError::NotFound)
        }
        SqlErr::ForeignKeyConstraintViolation(msg) if msg.contains(STUDENT_FOREIGN_KEY) => {
            Some(AppError::Unauthorized)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec_result(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_atomic_add_member_reports_conflict_as_not_added() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_result(1), exec_result(0)])
            .into_connection();
        let store = ClassStore::new(db);
        let (class_id, student_id) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(store.atomic_add_member(class_id, student_id).await.unwrap());
        assert!(!store.atomic_add_member(class_id, student_id).await.unwrap());

        let log = format!("{:?}", store.db.into_transaction_log());
        assert!(log.contains("ON CONFLICT"));
        assert!(log.contains("DO NOTHING"));
    }

    #[tokio::test]
    async fn test_atomic_add_member_store_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let store = ClassStore::new(db);

        let result = store.atomic_add_member(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_find_by_id_collects_members() {
        let class_id = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let now = Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![class::Model {
                id: class_id,
                title: "Algebra".to_string(),
                description: None,
                teacher_id: Uuid::new_v4(),
                time_slot: "Mon 09:00".to_string(),
                created_at: now,
            }]])
            .append_query_results([vec![
                enrollment::Model {
                    class_id,
                    student_id: a,
                    enrolled_at: now,
                },
                enrollment::Model {
                    class_id,
                    student_id: b,
                    enrolled_at: now,
                },
            ]])
            .into_connection();

        let class = ClassStore::new(db).find_by_id(class_id).await.unwrap().unwrap();
        assert_eq!(class.title, "Algebra");
        assert_eq!(class.students, BTreeSet::from([a, b]));
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<class::Model>::new()])
            .into_connection();

        assert!(ClassStore::new(db).find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[test]
    fn test_enroll_constraint_errors() {
        let class_gone = SqlErr::ForeignKeyConstraintViolation(format!(
            "insert or update on table \"class_enrollments\" violates foreign key constraint \"{}\"",
            CLASS_FOREIGN_KEY
        ));
        let student_gone = SqlErr::ForeignKeyConstraintViolation(format!(
            "insert or update on table \"class_enrollments\" violates foreign key constraint \"{}\"",
            STUDENT_FOREIGN_KEY
        ));
        let other = SqlErr::UniqueConstraintViolation("duplicate key".to_string());

        assert!(matches!(enroll_constraint_error(class_gone), Some(AppError::NotFound)));
        assert!(matches!(enroll_constraint_error(student_gone), Some(AppError::Unauthorized)));
        assert!(enroll_constraint_error(other).is_none());
    }
}
