//! Renovation tax-deduction calculation engine.
//!
//! The `engine` module is the pure core collaborators call directly. The remaining
//! modules load certificate documents, layer configuration and render reports for the
//! `renotax` binary.

pub mod certificate;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod report;
pub mod types;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const PARTIAL_FAILURE: i32 = 1;
    pub const INVALID_INPUT: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}
