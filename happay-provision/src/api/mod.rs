//! Happay add-user API
//!
//! Wire models for the add-user call, the HTTP client that issues it and the
//! per-row outcome it produces.

pub mod client;
pub mod models;
pub mod outcome;

pub use client::ProvisioningClient;
pub use models::{ExtraFields, ProvisionRequest, Title};
pub use outcome::ProvisionOutcome;
