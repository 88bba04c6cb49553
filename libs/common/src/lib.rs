//! Common library for the Wookie Books application
//!
//! This crate provides functionality shared by the services: the record
//! store abstraction used as the volatile database, and its error types.

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{MemoryStore, Record, Store};
