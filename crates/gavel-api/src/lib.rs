//! Gavel API - shared HTTP models
//!
//! Pagination and response envelope types shared between the services
//! and the HTTP layer.

pub mod model;

pub use model::{Page, PageParam};
