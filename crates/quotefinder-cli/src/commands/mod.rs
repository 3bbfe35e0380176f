//! CLI command handlers

pub mod export;
pub mod import;
pub mod search;
pub mod stats;
pub mod suggest;
