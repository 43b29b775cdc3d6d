//! Icon tag → vanilla substitute table.
//!
//! Every known [`IconTexture`] maps to exactly one substitute item and one
//! default name.  [`IconTexture::Invalid`] has no entry so that untagged or
//! unrecognised icons fall through to the keyword rules instead.

use crate::domain::text::{Text, TextColor};
use crate::item::{IconTexture, ItemKind};

/// Replacement for a tagged icon item.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSubstitute {
    pub kind: ItemKind,
    /// Name used only when the icon item carries no name of its own.
    pub default_name: &'static str,
    pub default_color: Option<TextColor>,
}

impl IconSubstitute {
    pub fn default_name(&self) -> Text {
        let text = Text::literal(self.default_name);
        match self.default_color {
            Some(color) => text.with_color(color),
            None => text,
        }
    }
}

/// Looks up the substitute for a tag; `None` only for [`IconTexture::Invalid`].
pub fn substitute(texture: IconTexture) -> Option<IconSubstitute> {
    let (kind, default_name, default_color) = match texture {
        IconTexture::NextPage => (
            ItemKind::GreenStainedGlass,
            "Next Page \u{2192}",
            Some(TextColor::Green),
        ),
        IconTexture::NextPageBlocked => (
            ItemKind::GrayStainedGlass,
            "Next Page \u{2192}",
            Some(TextColor::DarkGray),
        ),
        IconTexture::PreviousPage => (
            ItemKind::RedStainedGlass,
            "\u{2190} Previous Page",
            Some(TextColor::Red),
        ),
        IconTexture::PreviousPageBlocked => (
            ItemKind::GrayStainedGlass,
            "\u{2190} Previous Page",
            Some(TextColor::DarkGray),
        ),
        IconTexture::QuickPickup => (ItemKind::Chest, "Take All Items", Some(TextColor::Gold)),
        IconTexture::BreakGrave => (ItemKind::Tnt, "Break Grave", Some(TextColor::Red)),
        IconTexture::RemoveProtection => {
            (ItemKind::Shield, "Remove Protection", Some(TextColor::Red))
        }
        IconTexture::Tater => (ItemKind::Potato, "Tater", None),
        IconTexture::Invalid => return None,
    };
    Some(IconSubstitute {
        kind,
        default_name,
        default_color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KNOWN: &[IconTexture] = &[
        IconTexture::NextPage,
        IconTexture::NextPageBlocked,
        IconTexture::PreviousPage,
        IconTexture::PreviousPageBlocked,
        IconTexture::QuickPickup,
        IconTexture::BreakGrave,
        IconTexture::RemoveProtection,
        IconTexture::Tater,
    ];

    #[test]
    fn test_every_known_texture_has_a_substitute() {
        for &texture in ALL_KNOWN {
            assert!(substitute(texture).is_some(), "{texture:?} must map");
        }
    }

    #[test]
    fn test_invalid_texture_has_no_substitute() {
        assert_eq!(substitute(IconTexture::Invalid), None);
    }

    #[test]
    fn test_blocked_variants_differ_from_active_variants() {
        let pairs = [
            (IconTexture::NextPage, IconTexture::NextPageBlocked),
            (IconTexture::PreviousPage, IconTexture::PreviousPageBlocked),
        ];
        for (active, blocked) in pairs {
            let active = substitute(active).unwrap();
            let blocked = substitute(blocked).unwrap();
            assert_ne!(active.kind, blocked.kind);
            assert_eq!(blocked.kind, ItemKind::GrayStainedGlass);
        }
    }

    #[test]
    fn test_substitutes_are_never_head_shaped() {
        for &texture in ALL_KNOWN {
            let kind = substitute(texture).unwrap().kind;
            assert!(!matches!(kind, ItemKind::PlayerHead | ItemKind::IconItem));
        }
    }

    #[test]
    fn test_tater_default_name_is_uncoloured() {
        let name = substitute(IconTexture::Tater).unwrap().default_name();
        assert_eq!(name.color, None);
        assert_eq!(name.to_plain(), "Tater");
    }
}
