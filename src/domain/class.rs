//! Class domain entity and its membership set.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserResponse;

/// A scheduled class and the students enrolled in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: Uuid,
    /// Opaque scheduling label; overlapping slots are not detected.
    pub time_slot: String,
    pub students: BTreeSet<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Class {
    pub fn is_enrolled(&self, user_id: Uuid) -> bool {
        self.students.contains(&user_id)
    }
}

/// Data needed to insert a class.
#[derive(Debug, Clone)]
pub struct NewClass {
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: Uuid,
    pub time_slot: String,
}

impl NewClass {
    /// Materialize the record with a fresh identifier and no students.
    pub fn into_class(self) -> Class {
        Class {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            teacher_id: self.teacher_id,
            time_slot: self.time_slot,
            students: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }
}

/// Class as returned after creation
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    pub id: Uuid,
    #[schema(example = "Intro to Rust")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Teacher user id
    pub teacher: Uuid,
    #[schema(example = "Mon 09:00-10:30")]
    pub time_slot: String,
    /// Enrolled student ids
    pub students: Vec<Uuid>,
}

impl From<Class> for ClassResponse {
    fn from(class: Class) -> Self {
        Self {
            id: class.id,
            title: class.title,
            description: class.description,
            teacher: class.teacher_id,
            time_slot: class.time_slot,
            students: class.students.into_iter().collect(),
        }
    }
}

/// Class with teacher and students resolved to user records
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetails {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `null` when the teacher account no longer exists
    pub teacher: Option<UserResponse>,
    pub time_slot: String,
    pub students: Vec<UserResponse>,
}
