//! Gavel Account - account lifecycle services
//!
//! Store-backed services for account creation, authorisation, deletion,
//! audit logging, media applications, and the scheduled inactivity
//! lifecycle engine. External collaborators (identity directory,
//! notifications, subscriptions, image store) are reached through the
//! traits in `gavel-common`; reqwest-backed clients live in [`client`].

pub mod client;
pub mod model;
pub mod service;

pub use model::{AccountRequest, CreationReport, ErroredAccount, LifecycleThresholds};
