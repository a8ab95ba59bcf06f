//! Gavel Auth - authorisation and eligibility decision engine
//!
//! Pure decision rules over the role/provenance model:
//! - publication visibility by sensitivity and list type
//! - account management rules (who may create/update/delete whom)
//!
//! Role and provenance membership sets are centralised in [`model`] so
//! the sensitivity and account-management rules share one source of
//! truth. All functions here are side-effect free; store-backed wrappers
//! live in `gavel-account`.

pub mod management;
pub mod model;
pub mod sensitivity;

pub use management::{can_create_accounts, can_manage};
pub use model::{ListType, Sensitivity};
pub use sensitivity::is_authorised;
