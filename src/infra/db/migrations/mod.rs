//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_classes_table;
mod m20240101_000003_create_class_enrollments_table;

pub(crate) use m20240101_000003_create_class_enrollments_table::{
    CLASS_FOREIGN_KEY, STUDENT_FOREIGN_KEY,
};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_classes_table::Migration),
            Box::new(m20240101_000003_create_class_enrollments_table::Migration),
        ]
    }
}
