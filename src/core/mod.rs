//! Core types: errors, configuration, input paths.

pub mod config;
pub mod errors;
pub mod paths;
