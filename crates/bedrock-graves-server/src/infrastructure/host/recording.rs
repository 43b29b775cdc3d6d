//! A packet sink that records instead of sending.
//!
//! Lets integration tests assert on exactly what each viewer would have
//! received, in order.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use bedrock_graves_core::{ClientboundPacket, ViewerId};

use crate::application::ports::{PacketSink, PortError};

#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(ViewerId, ClientboundPacket)>>,
    unreachable: Mutex<HashSet<ViewerId>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every packet recorded so far, in send order.
    pub fn sent(&self) -> Vec<(ViewerId, ClientboundPacket)> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Packets recorded for `viewer`, in send order.
    pub fn packets_for(&self, viewer: ViewerId) -> Vec<ClientboundPacket> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(v, _)| *v == viewer)
            .map(|(_, packet)| packet.clone())
            .collect()
    }

    /// Names of the packets recorded for `viewer`, in send order.
    pub fn names_for(&self, viewer: ViewerId) -> Vec<&'static str> {
        self.packets_for(viewer)
            .iter()
            .map(ClientboundPacket::name)
            .collect()
    }

    pub fn clear(&self) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every send to `viewer` fail with [`PortError::ViewerGone`].
    pub fn make_unreachable(&self, viewer: ViewerId) {
        self.unreachable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(viewer);
    }
}

impl PacketSink for RecordingSink {
    fn send(&self, viewer: ViewerId, packet: ClientboundPacket) -> Result<(), PortError> {
        if self
            .unreachable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&viewer)
        {
            return Err(PortError::ViewerGone(viewer));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((viewer, packet));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn destroy(id: i32) -> ClientboundPacket {
        ClientboundPacket::DestroyEntities {
            entity_ids: vec![id],
        }
    }

    #[test]
    fn test_records_per_viewer_in_order() {
        // Arrange
        let sink = RecordingSink::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        // Act
        sink.send(a, destroy(1)).expect("send");
        sink.send(b, destroy(2)).expect("send");
        sink.send(a, destroy(3)).expect("send");

        // Assert
        assert_eq!(sink.packets_for(a), vec![destroy(1), destroy(3)]);
        assert_eq!(sink.names_for(b), vec!["destroy_entities"]);
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_clear_empties_recording() {
        let sink = RecordingSink::new();
        let viewer = Uuid::new_v4();
        sink.send(viewer, destroy(1)).expect("send");

        sink.clear();

        assert!(sink.is_empty());
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn test_unreachable_viewer_fails_without_recording() {
        let sink = RecordingSink::new();
        let viewer = Uuid::new_v4();
        sink.make_unreachable(viewer);

        assert_eq!(
            sink.send(viewer, destroy(1)),
            Err(PortError::ViewerGone(viewer))
        );
        assert!(sink.is_empty());
    }
}
