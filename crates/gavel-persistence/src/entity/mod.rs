//! Entity definitions

pub mod accounts;
pub mod audit_logs;
pub mod media_applications;
