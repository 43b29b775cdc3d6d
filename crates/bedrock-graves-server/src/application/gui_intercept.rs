//! Outbound GUI packet interception.
//!
//! Slot and inventory packets headed for a restricted viewer are passed
//! through the item translator.  A packet is rebuilt only when at least one
//! stack actually changed; everything else goes out untouched.

use std::borrow::Cow;
use std::sync::Arc;

use bedrock_graves_core::{ClientboundPacket, GuiTranslator, ItemStack, ViewerId};
use tracing::trace;

use super::capability::CapabilityCache;
use super::ports::{PacketSink, PortError};

/// Rewrites GUI packets for restricted viewers.
#[derive(Debug, Clone)]
pub struct OutboundInterceptor {
    capability: Arc<CapabilityCache>,
}

impl OutboundInterceptor {
    pub fn new(capability: Arc<CapabilityCache>) -> Self {
        Self { capability }
    }

    /// Returns the packet to actually send to `viewer`.
    pub fn intercept(&self, viewer: ViewerId, packet: ClientboundPacket) -> ClientboundPacket {
        if !is_gui_packet(&packet) || !self.capability.is_restricted(viewer) {
            return packet;
        }

        match packet {
            ClientboundPacket::SlotUpdate {
                sync_id,
                revision,
                slot,
                stack,
            } => {
                let stack = GuiTranslator::translate_owned(stack);
                ClientboundPacket::SlotUpdate {
                    sync_id,
                    revision,
                    slot,
                    stack,
                }
            }
            ClientboundPacket::InventoryContents {
                sync_id,
                revision,
                contents,
                cursor,
            } => {
                let (contents, cursor, changed) = translate_contents(contents, cursor);
                if changed > 0 {
                    trace!("translated {changed} stack(s) in window {sync_id} for {viewer}");
                }
                ClientboundPacket::InventoryContents {
                    sync_id,
                    revision,
                    contents,
                    cursor,
                }
            }
            other => other,
        }
    }
}

fn is_gui_packet(packet: &ClientboundPacket) -> bool {
    matches!(
        packet,
        ClientboundPacket::SlotUpdate { .. } | ClientboundPacket::InventoryContents { .. }
    )
}

/// Translates every stack and the cursor; returns how many changed.
fn translate_contents(
    contents: Vec<ItemStack>,
    cursor: ItemStack,
) -> (Vec<ItemStack>, ItemStack, usize) {
    let mut changed = 0;
    let mut translate = |stack: ItemStack| {
        let translated = match GuiTranslator::translate(&stack) {
            Cow::Borrowed(_) => None,
            Cow::Owned(translated) => Some(translated),
        };
        match translated {
            Some(translated) => {
                changed += 1;
                translated
            }
            None => stack,
        }
    };
    let contents = contents.into_iter().map(&mut translate).collect();
    let cursor = translate(cursor);
    (contents, cursor, changed)
}

/// A [`PacketSink`] that runs every packet through an [`OutboundInterceptor`]
/// before handing it to the inner sink.
pub struct InterceptingSink {
    inner: Arc<dyn PacketSink>,
    interceptor: OutboundInterceptor,
}

impl InterceptingSink {
    pub fn new(inner: Arc<dyn PacketSink>, interceptor: OutboundInterceptor) -> Self {
        Self { inner, interceptor }
    }
}

impl PacketSink for InterceptingSink {
    fn send(&self, viewer: ViewerId, packet: ClientboundPacket) -> Result<(), PortError> {
        self.inner
            .send(viewer, self.interceptor.intercept(viewer, packet))
    }
}
