//! Domain entities for bedrock-graves.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//! Code in the server crate depends on the domain, but the domain never
//! depends on it.

/// Block and world coordinates.
pub mod geometry;

/// The read-only grave payload and its lifecycle state.
pub mod grave;

/// Rendering of the five-line floating label shown above a grave.
pub mod label;

/// Minimal formatted text model (literal + colour + children).
pub mod text;
