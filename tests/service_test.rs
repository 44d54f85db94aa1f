//! Service unit tests against mocked repositories.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::predicate::eq;
use sea_orm::DbErr;
use uuid::Uuid;

use class_scheduler::config::{Config, HashCost};
use class_scheduler::domain::{Class, NewClass, User, UserRole};
use class_scheduler::errors::{AppError, AppResult};
use class_scheduler::infra::repositories::{MockClassRepository, MockUserRepository};
use class_scheduler::infra::{ClassRepository, Store, UserRepository};
use class_scheduler::services::{
    AuthService, Authenticator, ClassManager, ClassService, EnrollmentService, Enroller, Identity,
};

fn test_config() -> Config {
    let mut config = Config::with_secret("test-secret-key-for-testing-only-32chars");
    config.hash_cost = HashCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
    config
}

fn create_test_user(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "hashed".to_string(),
        role: UserRole::Student,
        created_at: Utc::now(),
    }
}

fn create_test_class(id: Uuid, students: &[Uuid]) -> Class {
    Class {
        id,
        title: "Algebra".to_string(),
        description: None,
        teacher_id: Uuid::new_v4(),
        time_slot: "Mon 9:00".to_string(),
        students: students.iter().copied().collect::<BTreeSet<_>>(),
        created_at: Utc::now(),
    }
}

/// Test store that hands out mocked repositories
struct TestStore {
    users: Arc<MockUserRepository>,
    classes: Arc<MockClassRepository>,
}

impl TestStore {
    fn new(users: MockUserRepository, classes: MockClassRepository) -> Arc<Self> {
        Arc::new(Self {
            users: Arc::new(users),
            classes: Arc::new(classes),
        })
    }
}

#[async_trait]
impl Store for TestStore {
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

fn student(user_id: Uuid) -> Identity {
    Identity {
        user_id,
        role: UserRole::Student,
    }
}

// =============================================================================
// Credential service
// =============================================================================

#[tokio::test]
async fn test_register_existing_email_is_duplicate() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .with(eq("a@x.com"))
        .returning(|email| Ok(Some(create_test_user(email))));
    users.expect_insert().times(0);

    let auth = Authenticator::new(TestStore::new(users, MockClassRepository::new()), test_config());
    let result = auth
        .register("A".into(), "a@x.com".into(), "secret1".into(), UserRole::Student)
        .await;

    assert!(matches!(result, Err(AppError::DuplicateIdentity)));
}

#[tokio::test]
async fn test_register_lost_race_on_insert_is_duplicate() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_insert()
        .times(1)
        .returning(|_| Err(AppError::DuplicateIdentity));

    let auth = Authenticator::new(TestStore::new(users, MockClassRepository::new()), test_config());
    let result = auth
        .register("A".into(), "a@x.com".into(), "secret1".into(), UserRole::Student)
        .await;

    assert!(matches!(result, Err(AppError::DuplicateIdentity)));
}

#[tokio::test]
async fn test_register_stores_hash_not_plaintext() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_insert()
        .withf(|new_user| {
            new_user.password_hash.starts_with("$argon2id$")
                && !new_user.password_hash.contains("secret1")
                && new_user.role == UserRole::Teacher
        })
        .returning(|new_user| Ok(new_user.into_user()));

    let auth = Authenticator::new(TestStore::new(users, MockClassRepository::new()), test_config());
    let token = auth
        .register("T".into(), "t@x.com".into(), "secret1".into(), UserRole::Teacher)
        .await
        .unwrap();

    assert_eq!(auth.verify_token(&token.token).unwrap().role, UserRole::Teacher);
}

#[tokio::test]
async fn test_register_store_failure_surfaces() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(|_| Err(AppError::from(DbErr::Custom("connection refused".into()))));

    let auth = Authenticator::new(TestStore::new(users, MockClassRepository::new()), test_config());
    let result = auth
        .register("A".into(), "a@x.com".into(), "secret1".into(), UserRole::Student)
        .await;

    assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
}

#[tokio::test]
async fn test_login_unknown_email_is_invalid_credentials() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let auth = Authenticator::new(TestStore::new(users, MockClassRepository::new()), test_config());
    let result = auth.login("nobody@x.com".into(), "secret1".into()).await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

// =============================================================================
// Enrollment service
// =============================================================================

#[tokio::test]
async fn test_enroll_unknown_class_is_not_found() {
    let class_id = Uuid::new_v4();
    let mut classes = MockClassRepository::new();
    classes
        .expect_find_by_id()
        .with(eq(class_id))
        .returning(|_| Ok(None));
    classes.expect_atomic_add_member().times(0);

    let enroller = Enroller::new(TestStore::new(MockUserRepository::new(), classes));
    let result = enroller.enroll(&student(Uuid::new_v4()), class_id).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_enroll_adds_caller_identity() {
    let class_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut classes = MockClassRepository::new();
    classes
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_class(id, &[]))));
    classes
        .expect_atomic_add_member()
        .with(eq(class_id), eq(user_id))
        .times(1)
        .returning(|_, _| Ok(true));

    let enroller = Enroller::new(TestStore::new(MockUserRepository::new(), classes));
    assert!(enroller.enroll(&student(user_id), class_id).await.is_ok());
}

#[tokio::test]
async fn test_enroll_member_in_snapshot_skips_write() {
    let user_id = Uuid::new_v4();

    let mut classes = MockClassRepository::new();
    classes
        .expect_find_by_id()
        .returning(move |id| Ok(Some(create_test_class(id, &[user_id]))));
    classes.expect_atomic_add_member().times(0);

    let enroller = Enroller::new(TestStore::new(MockUserRepository::new(), classes));
    let result = enroller.enroll(&student(user_id), Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::AlreadyEnrolled)));
}

#[tokio::test]
async fn test_enroll_stale_snapshot_store_decides() {
    // Another request added the caller between our read and our write
    let mut classes = MockClassRepository::new();
    classes
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_class(id, &[]))));
    classes
        .expect_atomic_add_member()
        .times(1)
        .returning(|_, _| Ok(false));

    let enroller = Enroller::new(TestStore::new(MockUserRepository::new(), classes));
    let result = enroller.enroll(&student(Uuid::new_v4()), Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::AlreadyEnrolled)));
}

#[tokio::test]
async fn test_enroll_store_failure_is_not_success() {
    let mut classes = MockClassRepository::new();
    classes
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_class(id, &[]))));
    classes
        .expect_atomic_add_member()
        .returning(|_, _| Err(AppError::from(DbErr::Custom("timeout".into()))));

    let enroller = Enroller::new(TestStore::new(MockUserRepository::new(), classes));
    let result = enroller.enroll(&student(Uuid::new_v4()), Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
}

// =============================================================================
// Class service
// =============================================================================

#[tokio::test]
async fn test_create_class_unknown_teacher_rejected() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));
    let mut classes = MockClassRepository::new();
    classes.expect_insert().times(0);

    let manager = ClassManager::new(TestStore::new(users, classes));
    let result = manager
        .create_class(NewClass {
            title: "Algebra".into(),
            description: None,
            teacher_id: Uuid::new_v4(),
            time_slot: "Mon 9:00".into(),
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_list_classes_resolves_users_in_one_lookup() {
    let teacher = create_test_user("t@x.com");
    let student_a = create_test_user("a@x.com");
    let missing = Uuid::new_v4();

    let mut class = create_test_class(Uuid::new_v4(), &[student_a.id, missing]);
    class.teacher_id = teacher.id;

    let mut classes = MockClassRepository::new();
    let listed = class.clone();
    classes.expect_list().returning(move || Ok(vec![listed.clone()]));

    let mut users = MockUserRepository::new();
    let known = vec![teacher.clone(), student_a.clone()];
    users
        .expect_find_by_ids()
        .times(1)
        .returning(move |_| Ok(known.clone()));

    let manager = ClassManager::new(TestStore::new(users, classes));
    let details = manager.list_classes().await.unwrap();

    assert_eq!(details.len(), 1);
    assert_eq!(details[0].teacher.as_ref().unwrap().id, teacher.id);
    assert_eq!(details[0].students.len(), 1);
    assert_eq!(details[0].students[0].id, student_a.id);
}
