//! Core services.
//!
//! - `blockchain`: chain clients per family and their HTTP transport
//! - `transaction`: capability traits, registry, status resolution and the transaction monitor

pub mod blockchain;
pub mod transaction;
