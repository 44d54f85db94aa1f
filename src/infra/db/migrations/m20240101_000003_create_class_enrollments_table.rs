//! Migration: Create class_enrollments table (class membership set).

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_classes_table::Classes;

/// Foreign key from a membership row to its class
pub(crate) const CLASS_FOREIGN_KEY: &str = "fk_class_enrollments_class_id";

/// Foreign key from a membership row to the enrolled user
pub(crate) const STUDENT_FOREIGN_KEY: &str = "fk_class_enrollments_student_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClassEnrollments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ClassEnrollments::ClassId).uuid().not_null())
                    .col(ColumnDef::new(ClassEnrollments::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(ClassEnrollments::EnrolledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // One row per (class, student): the conflict target for enrollment
                    .primary_key(
                        Index::create()
                            .col(ClassEnrollments::ClassId)
                            .col(ClassEnrollments::StudentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(CLASS_FOREIGN_KEY)
                            .from(ClassEnrollments::Table, ClassEnrollments::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(STUDENT_FOREIGN_KEY)
                            .from(ClassEnrollments::Table, ClassEnrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClassEnrollments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ClassEnrollments {
    Table,
    ClassId,
    StudentId,
    EnrolledAt,
}
