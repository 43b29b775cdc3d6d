//! Network infrastructure: per-viewer outbound frame channels.

pub mod outbound;
