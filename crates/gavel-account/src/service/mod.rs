//! Account-management services
//!
//! Free functions over a `DatabaseConnection` plus the collaborator
//! traits, mirroring the authorisation rules in `gavel-auth`.

pub mod account;
pub mod application;
pub mod audit;
pub mod authorisation;
pub mod lifecycle;
