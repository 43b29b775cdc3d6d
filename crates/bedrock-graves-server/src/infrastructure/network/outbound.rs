//! ConnectionSink: encodes packets and queues them on per-viewer channels.
//!
//! Each connected viewer has an unbounded channel whose receiving half is
//! owned by that viewer's writer task.  [`ConnectionSink::send_frame`] never
//! blocks, so it is safe to call from the host tick thread.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use bedrock_graves_core::{encode_packet, ClientboundPacket, CodecError, ViewerId};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::application::ports::{PacketSink, PortError};

/// Error type for outbound delivery.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("viewer {0} is not connected")]
    NotConnected(ViewerId),
    #[error("connection of viewer {0} is closed")]
    Closed(ViewerId),
    #[error("encoding failed: {0}")]
    Codec(#[from] CodecError),
}

/// Routes encoded frames to the writer task of each viewer.
#[derive(Debug, Default)]
pub struct ConnectionSink {
    connections: RwLock<HashMap<ViewerId, UnboundedSender<Vec<u8>>>>,
}

impl ConnectionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `viewer` and returns the receiver its writer task drains.
    ///
    /// Registering an already connected viewer replaces the old channel,
    /// which closes the old receiver.
    pub fn register(&self, viewer: ViewerId) -> UnboundedReceiver<Vec<u8>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let previous = self
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(viewer, tx);
        if previous.is_some() {
            debug!("viewer {viewer} re-registered; previous channel closed");
        }
        rx
    }

    /// Removes `viewer`.  Returns whether it was registered.
    pub fn unregister(&self, viewer: ViewerId) -> bool {
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&viewer)
            .is_some()
    }

    pub fn is_connected(&self, viewer: ViewerId) -> bool {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&viewer)
    }

    pub fn connection_count(&self) -> usize {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Encodes `packet` and queues the frame for `viewer`.
    ///
    /// # Errors
    ///
    /// - [`SinkError::NotConnected`] if the viewer was never registered.
    /// - [`SinkError::Closed`] if its writer task has gone away; the stale
    ///   entry is removed.
    /// - [`SinkError::Codec`] if the packet cannot be framed.
    pub fn send_frame(&self, viewer: ViewerId, packet: &ClientboundPacket) -> Result<(), SinkError> {
        let frame = encode_packet(packet)?;
        let sent = {
            let connections = self
                .connections
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            let tx = connections
                .get(&viewer)
                .ok_or(SinkError::NotConnected(viewer))?;
            tx.send(frame).is_ok()
        };

        if sent {
            Ok(())
        } else {
            self.unregister(viewer);
            Err(SinkError::Closed(viewer))
        }
    }
}

impl PacketSink for ConnectionSink {
    fn send(&self, viewer: ViewerId, packet: ClientboundPacket) -> Result<(), PortError> {
        self.send_frame(viewer, &packet).map_err(|e| match e {
            SinkError::NotConnected(v) | SinkError::Closed(v) => PortError::ViewerGone(v),
            other => PortError::Transport(other.to_string()),
        })
    }
}
