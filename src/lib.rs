//! promptd — LLM-classified task dispatch service.
//!
//! This library crate re-exports modules so integration tests
//! (under `tests/`) can access them.

pub mod catalog;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod server;
pub mod tasks;

pub use error::DispatchError;
