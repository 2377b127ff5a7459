//! Job posting quota enforcement and the Add Career wizard backend.
//!
//! Organizations publish careers against a plan-based slot allowance. The
//! [`workflows::careers`] module owns the quota decision, storage seams, and
//! the HTTP router; [`config`] and [`telemetry`] carry the process plumbing
//! shared with the API binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
