//! CLI command implementations.

pub mod common;
pub mod deutsch;
pub mod deutsch_jozsa;
pub mod job;
pub mod order_finding;
pub mod qft;
pub mod qpe;
pub mod version;
