//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod class;
pub mod enrollment;
pub mod user;
