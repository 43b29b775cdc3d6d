//! GUI item translation for bridged clients.
//!
//! The translator is a pure function consulted on the send path of every
//! outbound inventory packet, possibly from several connection threads at
//! once.  It holds no state and allocates only when it actually rewrites a
//! stack.
//!
//! # Resolution order
//!
//! 1. Empty stacks and stacks already carrying the translation marker are
//!    returned unchanged.
//! 2. An icon item with a known tag resolves through the fixed tag table in
//!    [`icon`].  The stack's own name and lore win over the table defaults.
//! 3. A named player head, or an icon item whose tag is unknown, is matched by
//!    its lower-cased name against the keyword tables in [`rules`]: mod
//!    phrases first, then generic phrases.
//! 4. Nothing matched: a paper placeholder keeps the original name and lore so
//!    the client never sees an unexplained default head.
//! 5. Any other item, including an unnamed decorative head, is untouched.

use std::borrow::Cow;

use tracing::trace;

use crate::domain::text::{Text, TextColor, LEGACY_DARK_GRAY};
use crate::item::{IconTexture, ItemKind, ItemStack};

pub mod icon;
pub mod rules;

use rules::RuleOutcome;

/// Name given to a nameless icon item that matches no rule.
const FALLBACK_BUTTON_NAME: &str = "Button";

/// Stateless translator for GUI item stacks.
pub struct GuiTranslator;

impl GuiTranslator {
    /// Translates `stack` into a representation bridged clients can render.
    ///
    /// Returns [`Cow::Borrowed`] when the stack needs no change, so callers can
    /// cheaply detect whether a packet must be rebuilt.  Translating an
    /// already translated stack always returns it unchanged.
    pub fn translate(stack: &ItemStack) -> Cow<'_, ItemStack> {
        if stack.is_empty() || stack.translated {
            return Cow::Borrowed(stack);
        }

        match stack.kind {
            ItemKind::IconItem => Cow::Owned(translate_icon_item(stack)),
            ItemKind::PlayerHead => match stack.custom_name {
                Some(ref name) => Cow::Owned(
                    translate_by_name(name, stack).unwrap_or_else(|| fallback_paper(name, stack)),
                ),
                // Decorative head without a name; leave it alone.
                None => Cow::Borrowed(stack),
            },
            _ => Cow::Borrowed(stack),
        }
    }

    /// Translates an owned stack, returning it untouched when no change applies.
    pub fn translate_owned(stack: ItemStack) -> ItemStack {
        let translated = match Self::translate(&stack) {
            Cow::Borrowed(_) => None,
            Cow::Owned(translated) => Some(translated),
        };
        translated.unwrap_or(stack)
    }
}

fn translate_icon_item(stack: &ItemStack) -> ItemStack {
    let texture = stack.icon.unwrap_or(IconTexture::Invalid);
    if let Some(substitute) = icon::substitute(texture) {
        let name = stack
            .custom_name
            .clone()
            .unwrap_or_else(|| substitute.default_name());
        return create_item(substitute.kind.clone(), name, stack);
    }

    // Unknown tag: fall back to the name heuristics.
    match stack.custom_name {
        Some(ref name) => {
            translate_by_name(name, stack).unwrap_or_else(|| fallback_paper(name, stack))
        }
        None => create_item(ItemKind::Paper, Text::literal(FALLBACK_BUTTON_NAME), stack),
    }
}

fn translate_by_name(name: &Text, stack: &ItemStack) -> Option<ItemStack> {
    let lower = name.to_plain().to_lowercase();
    let outcome = rules::match_rules(&lower)?;
    let disabled = is_disabled(name, &lower);

    let (kind, label) = match outcome {
        RuleOutcome::Fixed { kind, label, color } => (kind.clone(), Text::colored(*label, *color)),
        RuleOutcome::KeepName { kind } => (kind.clone(), name.clone()),
        RuleOutcome::Navigation {
            kind,
            label,
            color,
        } if !disabled => (kind.clone(), Text::colored(*label, *color)),
        RuleOutcome::Navigation { label, .. } => (
            ItemKind::GrayStainedGlass,
            Text::colored(*label, TextColor::DarkGray),
        ),
    };
    Some(create_item(kind, label, stack))
}

fn fallback_paper(name: &Text, stack: &ItemStack) -> ItemStack {
    trace!(name = %name.to_plain(), kind = stack.kind.id(), "no rule matched; using paper placeholder");
    create_item(ItemKind::Paper, name.clone(), stack)
}

/// A greyed-out button is either prefixed with the legacy dark-gray code or
/// coloured dark gray.
fn is_disabled(name: &Text, lower: &str) -> bool {
    if lower.starts_with(LEGACY_DARK_GRAY) {
        return true;
    }
    let color = name
        .color
        .or_else(|| name.extra.first().and_then(|child| child.color));
    color == Some(TextColor::DarkGray)
}

fn create_item(kind: ItemKind, name: Text, original: &ItemStack) -> ItemStack {
    ItemStack {
        kind,
        count: original.count.max(1),
        custom_name: Some(name),
        lore: original.lore.clone(),
        icon: None,
        translated: true,
    }
}
