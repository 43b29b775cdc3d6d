//! Application layer: the shim's use cases.
//!
//! Everything here runs against the collaborator traits in [`ports`] and the
//! pure types of `bedrock_graves_core`.  No sockets, files, or host internals
//! are touched directly, so each use case is unit-testable with mocks.
//!
//! # Sub-modules
//!
//! - **`overlay_engine`** – Per (viewer, grave) state machine that spawns,
//!   refreshes, and tears down the synthetic label and prop, and swaps the
//!   grave block for a disguise.  Runs on the host tick thread.
//!
//! - **`gui_intercept`** – Rewrites outbound GUI packets for restricted
//!   viewers through the item translator.  Runs on connection send paths.
//!
//! - **`capability`** – Resolves the optional capability oracle once at
//!   startup and memoises per-viewer answers.
//!
//! - **`sight`** – The five-ray line-of-sight check.
//!
//! - **`deferred`** / **`retry`** – Tick-drained task queue and bounded
//!   retries with backoff measured in ticks.

pub mod capability;
pub mod deferred;
pub mod gui_intercept;
pub mod overlay_engine;
pub mod ports;
pub mod retry;
pub mod sight;
