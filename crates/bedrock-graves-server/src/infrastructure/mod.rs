//! Infrastructure layer: adapters behind the application's ports.
//!
//! Contains the TOML config loader, the connection-backed packet sink, and
//! an in-memory host used by the headless binary and the integration tests.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `bedrock_graves_core`, but MUST NOT be imported by the `application` layer.

pub mod host;
pub mod network;
pub mod storage;
