//! Campus navigation CLI library.
//!
//! Command handlers and output formatting shared by the `campus-nav` binary
//! and its integration tests.

pub mod commands;
pub mod output;
