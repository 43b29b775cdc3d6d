//! A capability oracle backed by a fixed set of viewers.
//!
//! The headless binary fills it from `general.restricted_viewers`; tests mark
//! viewers as they join.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use bedrock_graves_core::ViewerId;

use crate::application::ports::{CapabilityOracle, PortError};

#[derive(Debug, Default)]
pub struct StaticOracle {
    restricted: RwLock<HashSet<ViewerId>>,
}

impl StaticOracle {
    pub fn new(restricted: impl IntoIterator<Item = ViewerId>) -> Self {
        Self {
            restricted: RwLock::new(restricted.into_iter().collect()),
        }
    }

    pub fn mark_restricted(&self, viewer: ViewerId) {
        self.restricted
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(viewer);
    }
}

impl CapabilityOracle for StaticOracle {
    fn is_restricted(&self, viewer: ViewerId) -> Result<bool, PortError> {
        Ok(self
            .restricted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&viewer))
    }
}
