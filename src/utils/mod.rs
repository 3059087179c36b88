//! Utility modules shared across the crate.
//!
//! - encoding: integer and address encodings used by the wire formats
//! - logging: tracing subscriber setup

pub mod encoding;
pub mod logging;
