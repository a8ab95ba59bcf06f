//! Gavel Persistence - database entities
//!
//! SeaORM entity definitions for accounts, audit logs, and media
//! accreditation applications.

pub mod entity;

// Re-export sea-orm for convenience
pub use sea_orm;

pub use entity::accounts::{Provenance, Role};
pub use entity::audit_logs::AuditAction;
pub use entity::media_applications::ApplicationStatus;
