//! Storage infrastructure: configuration file loading.

pub mod config;
