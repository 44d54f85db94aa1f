//! Domain layer - Core business entities and logic
//!
//! Users, classes and the password value object. Nothing here touches the
//! store or the HTTP layer.

pub mod class;
pub mod password;
pub mod user;

pub use class::{Class, ClassDetails, ClassResponse, NewClass};
pub use password::Password;
pub use user::{NewUser, User, UserResponse, UserRole};
