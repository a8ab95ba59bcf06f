//! Gavel Server - HTTP surface for the account management service

pub mod api;
pub mod model;
pub mod startup;
