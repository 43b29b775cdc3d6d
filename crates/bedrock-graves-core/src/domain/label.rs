//! Floating label text rendered above a grave.
//!
//! ```text
//! Grave of Steve                      (yellow)
//! Steve fell from a high place        (yellow)
//! Items: 12  XP: 30                   (white)
//! Protected for: 4m 10s               (blue + white)
//! Breaks in: 1h 4m 10s                (red + white)
//! ```

use std::time::Duration;

use super::grave::GraveSnapshot;
use super::text::{Text, TextColor};

/// Placeholder owner name when the grave has none.
const UNKNOWN_OWNER: &str = "<Unknown>";

/// Formatting options for the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFormat {
    /// Rendered instead of a duration when a timer never expires.
    pub infinity_text: String,
}

impl Default for LabelFormat {
    fn default() -> Self {
        Self {
            infinity_text: "\u{221e}".to_string(),
        }
    }
}

/// Builds the five-line label for `grave`.
pub fn build_label(grave: &GraveSnapshot, format: &LabelFormat) -> Text {
    let owner = grave.owner_name.as_deref().unwrap_or(UNKNOWN_OWNER);
    let death = grave.death_cause.as_deref().unwrap_or_default();

    let lines = [
        Text::colored(format!("Grave of {owner}"), TextColor::Yellow),
        Text::colored(death, TextColor::Yellow),
        Text::colored(
            format!("Items: {}  XP: {}", grave.item_count(), grave.xp),
            TextColor::White,
        ),
        Text::colored("Protected for: ", TextColor::Blue).append(Text::colored(
            format_remaining(grave.protection_left, format),
            TextColor::White,
        )),
        Text::colored("Breaks in: ", TextColor::Red).append(Text::colored(
            format_remaining(grave.breaking_left, format),
            TextColor::White,
        )),
    ];

    let mut root = Text::empty();
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            root = root.append(Text::literal("\n"));
        }
        root = root.append(line);
    }
    root
}

fn format_remaining(left: Option<Duration>, format: &LabelFormat) -> String {
    match left {
        Some(duration) => format_duration(duration),
        None => format.infinity_text.clone(),
    }
}

/// Formats a duration as `1h 2m 3s`, dropping leading zero units.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemKind, ItemStack};

    fn grave() -> GraveSnapshot {
        GraveSnapshot {
            owner_name: Some("Steve".into()),
            death_cause: Some("Steve fell from a high place".into()),
            items: vec![
                ItemStack::new(ItemKind::Other("minecraft:apple".into()), 5),
                ItemStack::empty(),
            ],
            xp: 30,
            protection_left: Some(Duration::from_secs(250)),
            breaking_left: None,
        }
    }

    #[test]
    fn test_build_label_renders_five_lines() {
        // Arrange
        let format = LabelFormat::default();

        // Act
        let plain = build_label(&grave(), &format).to_plain();

        // Assert
        let lines: Vec<&str> = plain.split('\n').collect();
        assert_eq!(
            lines,
            vec![
                "Grave of Steve",
                "Steve fell from a high place",
                "Items: 1  XP: 30",
                "Protected for: 4m 10s",
                "Breaks in: \u{221e}",
            ]
        );
    }

    #[test]
    fn test_build_label_uses_placeholder_for_missing_owner() {
        let snapshot = GraveSnapshot::default();
        let plain = build_label(&snapshot, &LabelFormat::default()).to_plain();
        assert!(plain.starts_with("Grave of <Unknown>\n\n"));
    }

    #[test]
    fn test_build_label_respects_custom_infinity_text() {
        let format = LabelFormat {
            infinity_text: "forever".into(),
        };
        let plain = build_label(&grave(), &format).to_plain();
        assert!(plain.ends_with("Breaks in: forever"));
    }

    #[test]
    fn test_format_duration_drops_leading_zero_units() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(59)), "59s");
        assert_eq!(format_duration(Duration::from_secs(61)), "1m 1s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h 2m 3s");
    }

    #[test]
    fn test_label_is_deterministic_for_same_snapshot() {
        let format = LabelFormat::default();
        assert_eq!(build_label(&grave(), &format), build_label(&grave(), &format));
    }
}
