//! tablecmp-core
//!
//! Core library for the function-table comparison step of the reassembly
//! evaluation pipeline.
//!
//! This crate defines the job model, the declarative option grid, the on-disk
//! path conventions, binary exclusion rules, the job enumerator, and the
//! runner that drives the external comparison tool.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends.

pub mod model;
pub mod config;
pub mod layout;
pub mod exclusion;
pub mod enumerator;
pub mod services;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
