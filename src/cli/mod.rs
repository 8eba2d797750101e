//! CLI command handling

pub mod send;

pub use send::*;
