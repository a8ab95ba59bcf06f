//! Gavel Common - Shared types, traits, and utilities
//!
//! This crate provides the foundational types used across all Gavel components:
//! - Error types and error codes
//! - Collaborator traits for dependency injection
//! - Validation utilities

pub mod error;
pub mod traits;
pub mod utils;

// Re-exports for convenience
pub use error::{ErrorCode, GavelError};
pub use traits::*;
pub use utils::is_valid_email;

/// Header carrying the id of the admin issuing a request
pub const ISSUER_ID_HEADER: &str = "x-issuer-id";

/// Page size used by bulk maintenance deletions
pub const BULK_DELETE_PAGE_SIZE: u64 = 25;
