//! Allocator for client-only entity ids.
//!
//! # Why negative ids? (for beginners)
//!
//! The server hands out entity ids counting up from 1.  The labels and props
//! the shim injects exist only on one client, so their ids must never collide
//! with a real entity the same client might later hear about.  Counting *down*
//! from a large negative number keeps the two ranges disjoint for the life of
//! any realistic server.
//!
//! # Thread safety
//!
//! The counter is an `AtomicI32` advanced with `fetch_update`, so concurrent
//! callers never receive the same id.

use std::sync::atomic::{AtomicI32, Ordering};

/// Entity id as sent on the wire.
pub type EntityId = i32;

/// First id handed out by a fresh allocator.
pub const ENTITY_ID_START: EntityId = -2_000_000_000;

/// Ids are never handed out below this floor; the allocator wraps back to
/// [`ENTITY_ID_START`] instead of reaching `i32::MIN`.
pub const ENTITY_ID_FLOOR: EntityId = i32::MIN + 1;

/// Process-wide source of unique synthetic entity ids.
///
/// # Examples
///
/// ```rust
/// use bedrock_graves_core::protocol::EntityIdAllocator;
///
/// let ids = EntityIdAllocator::new();
/// assert_eq!(ids.next(), -2_000_000_000);
/// assert_eq!(ids.next(), -2_000_000_001);
/// ```
#[derive(Debug)]
pub struct EntityIdAllocator {
    inner: AtomicI32,
}

impl EntityIdAllocator {
    pub fn new() -> Self {
        Self::starting_at(ENTITY_ID_START)
    }

    fn starting_at(first: EntityId) -> Self {
        Self {
            inner: AtomicI32::new(first),
        }
    }

    /// Returns the next id and advances the counter downwards.
    pub fn next(&self) -> EntityId {
        let previous = self
            .inner
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(if current <= ENTITY_ID_FLOOR {
                    ENTITY_ID_START
                } else {
                    current - 1
                })
            });
        // The closure always returns Some, so both arms carry the old value.
        match previous {
            Ok(id) | Err(id) => id,
        }
    }
}

impl Default for EntityIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
