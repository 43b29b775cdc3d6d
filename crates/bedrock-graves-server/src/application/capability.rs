//! Capability resolution: which viewers need the overlay and GUI rewrites.
//!
//! The oracle that tells bridged clients apart is an optional component of
//! the host.  It is looked up exactly once at startup.  When it is absent every
//! viewer is treated as unrestricted and the whole shim becomes a no-op.
//!
//! Per-viewer answers are memoised in a [`CapabilityCache`] shared by the
//! overlay engine (tick thread) and the GUI interceptor (connection threads).

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use bedrock_graves_core::ViewerId;
use tracing::{debug, info};

use super::ports::CapabilityOracle;

/// Startup lookup for the optional oracle.
pub trait OracleSource {
    fn detect(&self) -> Option<Arc<dyn CapabilityOracle>>;
}

impl<F> OracleSource for F
where
    F: Fn() -> Option<Arc<dyn CapabilityOracle>>,
{
    fn detect(&self) -> Option<Arc<dyn CapabilityOracle>> {
        self()
    }
}

/// Outcome of the startup lookup.
#[derive(Clone)]
pub enum Capability {
    Present(Arc<dyn CapabilityOracle>),
    Absent,
}

impl Capability {
    /// Runs `source` once and logs whether overlays are enabled.
    pub fn resolve(source: &dyn OracleSource) -> Self {
        match source.detect() {
            Some(oracle) => {
                info!("capability oracle found; overlays and GUI translation enabled");
                Capability::Present(oracle)
            }
            None => {
                info!("no capability oracle; every viewer is treated as unrestricted");
                Capability::Absent
            }
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Capability::Present(_))
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.is_present() { "Present" } else { "Absent" })
    }
}

/// Memoised per-viewer capability.
///
/// Oracle errors are not cached, so the next lookup asks again.
#[derive(Debug)]
pub struct CapabilityCache {
    capability: Capability,
    answers: RwLock<HashMap<ViewerId, bool>>,
}

impl CapabilityCache {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            answers: RwLock::new(HashMap::new()),
        }
    }

    /// A cache over an absent oracle.
    pub fn disabled() -> Self {
        Self::new(Capability::Absent)
    }

    pub fn is_enabled(&self) -> bool {
        self.capability.is_present()
    }

    /// Whether `viewer` needs overlays and GUI rewrites.
    pub fn is_restricted(&self, viewer: ViewerId) -> bool {
        let oracle = match &self.capability {
            Capability::Present(oracle) => oracle,
            Capability::Absent => return false,
        };

        if let Some(&known) = self
            .answers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&viewer)
        {
            return known;
        }

        match oracle.is_restricted(viewer) {
            Ok(restricted) => {
                self.answers
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(viewer, restricted);
                restricted
            }
            Err(e) => {
                debug!("capability lookup for {viewer} failed: {e}");
                false
            }
        }
    }

    /// Drops the memoised answer for a disconnected viewer.
    pub fn forget(&self, viewer: ViewerId) {
        self.answers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&viewer);
    }

    /// Number of memoised answers.
    pub fn cached_len(&self) -> usize {
        self.answers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockCapabilityOracle, PortError};
    use uuid::Uuid;

    fn cache_over(oracle: MockCapabilityOracle) -> CapabilityCache {
        let oracle: Arc<dyn CapabilityOracle> = Arc::new(oracle);
        CapabilityCache::new(Capability::resolve(&move || Some(Arc::clone(&oracle))))
    }

    #[test]
    fn test_absent_oracle_makes_everyone_unrestricted() {
        // Arrange
        let cache = CapabilityCache::new(Capability::resolve(
            &|| -> Option<Arc<dyn CapabilityOracle>> { None },
        ));

        // Act / Assert
        assert!(!cache.is_enabled());
        assert!(!cache.is_restricted(Uuid::new_v4()));
        assert_eq!(cache.cached_len(), 0);
    }

    #[test]
    fn test_answer_is_memoised_after_first_lookup() {
        // Arrange – the oracle may be asked exactly once
        let viewer = Uuid::new_v4();
        let mut oracle = MockCapabilityOracle::new();
        oracle
            .expect_is_restricted()
            .withf(move |v| *v == viewer)
            .times(1)
            .returning(|_| Ok(true));
        let cache = cache_over(oracle);

        // Act
        let first = cache.is_restricted(viewer);
        let second = cache.is_restricted(viewer);

        // Assert
        assert!(first && second);
        assert_eq!(cache.cached_len(), 1);
    }

    #[test]
    fn test_oracle_error_is_false_and_not_cached() {
        let mut oracle = MockCapabilityOracle::new();
        oracle
            .expect_is_restricted()
            .times(2)
            .returning(|_| Err(PortError::Host("oracle offline".into())));
        let cache = cache_over(oracle);
        let viewer = Uuid::new_v4();

        assert!(!cache.is_restricted(viewer));
        assert!(!cache.is_restricted(viewer));
        assert_eq!(cache.cached_len(), 0);
    }

    #[test]
    fn test_forget_asks_the_oracle_again() {
        let mut oracle = MockCapabilityOracle::new();
        oracle.expect_is_restricted().times(2).returning(|_| Ok(true));
        let cache = cache_over(oracle);
        let viewer = Uuid::new_v4();

        cache.is_restricted(viewer);
        cache.forget(viewer);
        assert_eq!(cache.cached_len(), 0);
        assert!(cache.is_restricted(viewer));
    }
}
