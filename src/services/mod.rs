//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and the store adapter. They hold no
//! mutable state of their own; each request is processed independently.

mod auth_service;
mod class_service;
pub mod container;
mod enrollment_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, Identity, TokenResponse};
pub use class_service::{ClassManager, ClassService};
pub use enrollment_service::{EnrollmentService, Enroller};
