//! Item stacks as they appear in GUI and equipment packets.
//!
//! # Icon items (for beginners)
//!
//! The grave mod draws its GUI buttons with a single custom item, the
//! *icon item*, and stores which button it is in a small tag component
//! ([`IconTexture`]).  On the wire a server-side library later turns the icon
//! item into a textured player head.  Bridged clients cannot show those
//! textures, so every button would look like the same default head.  The
//! translator reads the tag (or, when the tag is gone, the button name) and
//! swaps in a plain vanilla item.

use serde::{Deserialize, Serialize};

use crate::domain::text::Text;

pub mod kind;

pub use kind::ItemKind;

/// Button tag carried by the grave mod's icon item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconTexture {
    NextPage,
    NextPageBlocked,
    PreviousPage,
    PreviousPageBlocked,
    QuickPickup,
    BreakGrave,
    RemoveProtection,
    Tater,
    /// Missing or unrecognised tag.
    Invalid,
}

impl IconTexture {
    /// Parses the tag's serialized name.
    ///
    /// Returns [`IconTexture::Invalid`] for anything unrecognised.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "next_page" => IconTexture::NextPage,
            "next_page_blocked" => IconTexture::NextPageBlocked,
            "previous_page" => IconTexture::PreviousPage,
            "previous_page_blocked" => IconTexture::PreviousPageBlocked,
            "quick_pickup" => IconTexture::QuickPickup,
            "break_grave" => IconTexture::BreakGrave,
            "remove_protection" => IconTexture::RemoveProtection,
            "tater" => IconTexture::Tater,
            _ => IconTexture::Invalid,
        }
    }
}

/// A stack of items with the display components the shim cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub count: u8,
    /// Custom display name, if any.
    pub custom_name: Option<Text>,
    /// Descriptive lines shown under the name.
    pub lore: Vec<Text>,
    /// Button tag; only meaningful on [`ItemKind::IconItem`].
    pub icon: Option<IconTexture>,
    /// Set on every stack produced by the translator.
    pub translated: bool,
}

impl ItemStack {
    pub fn new(kind: ItemKind, count: u8) -> Self {
        Self {
            kind,
            count,
            custom_name: None,
            lore: Vec::new(),
            icon: None,
            translated: false,
        }
    }

    /// The empty stack (air).
    pub fn empty() -> Self {
        Self::new(ItemKind::Air, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.kind == ItemKind::Air || self.count == 0
    }

    pub fn with_name(mut self, name: Text) -> Self {
        self.custom_name = Some(name);
        self
    }

    pub fn with_lore(mut self, lore: Vec<Text>) -> Self {
        self.lore = lore;
        self
    }

    pub fn with_icon(mut self, icon: IconTexture) -> Self {
        self.icon = Some(icon);
        self
    }

    /// A copy of this stack with a count of one.
    pub fn single(&self) -> Self {
        let mut copy = self.clone();
        copy.count = 1;
        copy
    }
}

impl Default for ItemStack {
    fn default() -> Self {
        Self::empty()
    }
}
