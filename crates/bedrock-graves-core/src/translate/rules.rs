//! Keyword rule tables for buttons identified only by their display name.
//!
//! Two tables are consulted in order: phrases the grave mod is known to use,
//! then generic phrases common to other GUI mods.  Within a table the first
//! rule with any matching keyword wins.  Keywords are compared against the
//! lower-cased plain name with a substring test.

use crate::domain::text::TextColor;
use crate::item::ItemKind;

/// What a matched rule turns the button into.
#[derive(Debug, PartialEq)]
pub enum RuleOutcome {
    /// Fixed item and fixed label.
    Fixed {
        kind: ItemKind,
        label: &'static str,
        color: TextColor,
    },
    /// Fixed item; the original name is kept.
    KeepName { kind: ItemKind },
    /// Page navigation: the active item unless the button is greyed out, in
    /// which case gray glass with a dark gray label.
    Navigation {
        kind: ItemKind,
        label: &'static str,
        color: TextColor,
    },
}

#[derive(Debug)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub outcome: RuleOutcome,
}

impl KeywordRule {
    fn matches(&self, name_lower: &str) -> bool {
        self.keywords.iter().any(|k| name_lower.contains(k))
    }
}

/// Exact phrases used by the grave mod's own buttons.
pub static MOD_RULES: [KeywordRule; 5] = [
    KeywordRule {
        keywords: &["next page"],
        outcome: RuleOutcome::Navigation {
            kind: ItemKind::GreenStainedGlass,
            label: "Next Page \u{2192}",
            color: TextColor::Green,
        },
    },
    KeywordRule {
        keywords: &["previous page"],
        outcome: RuleOutcome::Navigation {
            kind: ItemKind::RedStainedGlass,
            label: "\u{2190} Previous Page",
            color: TextColor::Red,
        },
    },
    KeywordRule {
        keywords: &["take all", "quick pickup"],
        outcome: RuleOutcome::Fixed {
            kind: ItemKind::Chest,
            label: "Take All Items",
            color: TextColor::Gold,
        },
    },
    KeywordRule {
        keywords: &["break grave"],
        outcome: RuleOutcome::Fixed {
            kind: ItemKind::Tnt,
            label: "Break Grave",
            color: TextColor::Red,
        },
    },
    KeywordRule {
        keywords: &["remove protection"],
        outcome: RuleOutcome::Fixed {
            kind: ItemKind::Shield,
            label: "Remove Protection",
            color: TextColor::Red,
        },
    },
];

/// Generic phrases shared by many GUI mods.
pub static GENERIC_RULES: [KeywordRule; 10] = [
    KeywordRule {
        keywords: &["next", "forward", ">>", "\u{2192}"],
        outcome: RuleOutcome::Navigation {
            kind: ItemKind::GreenStainedGlass,
            label: "Next \u{2192}",
            color: TextColor::Green,
        },
    },
    KeywordRule {
        keywords: &["previous", "prev", "<<", "\u{2190}"],
        outcome: RuleOutcome::Navigation {
            kind: ItemKind::RedStainedGlass,
            label: "\u{2190} Previous",
            color: TextColor::Red,
        },
    },
    KeywordRule {
        keywords: &["back"],
        outcome: RuleOutcome::Fixed {
            kind: ItemKind::Arrow,
            label: "\u{2190} Back",
            color: TextColor::Yellow,
        },
    },
    KeywordRule {
        keywords: &["close", "exit", "cancel"],
        outcome: RuleOutcome::Fixed {
            kind: ItemKind::Barrier,
            label: "Close",
            color: TextColor::Red,
        },
    },
    KeywordRule {
        keywords: &["confirm", "click again"],
        outcome: RuleOutcome::Fixed {
            kind: ItemKind::LimeDye,
            label: "Confirm",
            color: TextColor::Green,
        },
    },
    KeywordRule {
        keywords: &["collect", "take", "retrieve", "claim"],
        outcome: RuleOutcome::Fixed {
            kind: ItemKind::Chest,
            label: "Collect Items",
            color: TextColor::Gold,
        },
    },
    KeywordRule {
        keywords: &["delete", "destroy"],
        outcome: RuleOutcome::Fixed {
            kind: ItemKind::LavaBucket,
            label: "Delete",
            color: TextColor::DarkRed,
        },
    },
    KeywordRule {
        keywords: &["info", "help", "?"],
        outcome: RuleOutcome::Fixed {
            kind: ItemKind::Book,
            label: "Info",
            color: TextColor::Aqua,
        },
    },
    KeywordRule {
        keywords: &["grave", "death", "died"],
        outcome: RuleOutcome::KeepName {
            kind: ItemKind::SkeletonSkull,
        },
    },
    KeywordRule {
        keywords: &["protect", "lock", "unlock"],
        outcome: RuleOutcome::KeepName {
            kind: ItemKind::Shield,
        },
    },
];

/// Runs the mod table, then the generic table, returning the first match.
pub fn match_rules(name_lower: &str) -> Option<&'static RuleOutcome> {
    MOD_RULES
        .iter()
        .chain(GENERIC_RULES.iter())
        .find(|rule| rule.matches(name_lower))
        .map(|rule| &rule.outcome)
}
