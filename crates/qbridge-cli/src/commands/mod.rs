//! CLI command implementations.

pub mod bench;
pub mod common;
pub mod convert;
pub mod list;
pub mod version;
