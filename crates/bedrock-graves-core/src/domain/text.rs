//! Minimal formatted text model.
//!
//! A [`Text`] is a literal string with an optional colour and a list of
//! appended children, the same tree shape the host protocol uses for item
//! names and entity custom names.  Only the pieces the shim reads or writes
//! are modelled.

use serde::{Deserialize, Serialize};

/// Legacy formatting prefix for dark gray (`§8`), still emitted by some GUIs.
pub const LEGACY_DARK_GRAY: &str = "\u{a7}8";

/// Named text colours used by the shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextColor {
    Yellow,
    White,
    Blue,
    Red,
    DarkRed,
    Green,
    DarkGray,
    Gold,
    Aqua,
}

impl TextColor {
    /// Returns the protocol name of the colour, e.g. `"dark_gray"`.
    pub fn name(self) -> &'static str {
        match self {
            TextColor::Yellow => "yellow",
            TextColor::White => "white",
            TextColor::Blue => "blue",
            TextColor::Red => "red",
            TextColor::DarkRed => "dark_red",
            TextColor::Green => "green",
            TextColor::DarkGray => "dark_gray",
            TextColor::Gold => "gold",
            TextColor::Aqua => "aqua",
        }
    }
}

/// A styled text component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    pub color: Option<TextColor>,
    pub extra: Vec<Text>,
}

impl Text {
    /// An empty component, used as the root when joining lines.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An uncoloured literal.
    pub fn literal(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            color: None,
            extra: Vec::new(),
        }
    }

    /// A literal with the given colour.
    pub fn colored(content: impl Into<String>, color: TextColor) -> Self {
        Self::literal(content).with_color(color)
    }

    pub fn with_color(mut self, color: TextColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Appends a child component.
    pub fn append(mut self, child: Text) -> Self {
        self.extra.push(child);
        self
    }

    /// Flattens the tree into its plain string, depth first.
    pub fn to_plain(&self) -> String {
        let mut out = String::with_capacity(self.content.len());
        self.write_plain(&mut out);
        out
    }

    fn write_plain(&self, out: &mut String) {
        out.push_str(&self.content);
        for child in &self.extra {
            child.write_plain(out);
        }
    }
}
