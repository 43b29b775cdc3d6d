//! Item identifiers.
//!
//! Only the items the shim recognises or emits get their own variant; every
//! other registry id is carried verbatim in [`ItemKind::Other`].

use serde::{Deserialize, Serialize};

/// Registry id of the grave mod's custom GUI icon item.
pub const ICON_ITEM_ID: &str = "universal_graves:icon";

/// Item type of a stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Air,
    /// The grave mod's custom button item.
    IconItem,
    PlayerHead,
    SkeletonSkull,
    GreenStainedGlass,
    GrayStainedGlass,
    RedStainedGlass,
    Chest,
    Tnt,
    Shield,
    Potato,
    Paper,
    Arrow,
    Barrier,
    LimeDye,
    LavaBucket,
    Book,
    Compass,
    /// Any other registry id, e.g. `minecraft:apple`.
    Other(String),
}

impl ItemKind {
    /// Returns the registry id of this item.
    pub fn id(&self) -> &str {
        match self {
            ItemKind::Air => "minecraft:air",
            ItemKind::IconItem => ICON_ITEM_ID,
            ItemKind::PlayerHead => "minecraft:player_head",
            ItemKind::SkeletonSkull => "minecraft:skeleton_skull",
            ItemKind::GreenStainedGlass => "minecraft:green_stained_glass",
            ItemKind::GrayStainedGlass => "minecraft:gray_stained_glass",
            ItemKind::RedStainedGlass => "minecraft:red_stained_glass",
            ItemKind::Chest => "minecraft:chest",
            ItemKind::Tnt => "minecraft:tnt",
            ItemKind::Shield => "minecraft:shield",
            ItemKind::Potato => "minecraft:potato",
            ItemKind::Paper => "minecraft:paper",
            ItemKind::Arrow => "minecraft:arrow",
            ItemKind::Barrier => "minecraft:barrier",
            ItemKind::LimeDye => "minecraft:lime_dye",
            ItemKind::LavaBucket => "minecraft:lava_bucket",
            ItemKind::Book => "minecraft:book",
            ItemKind::Compass => "minecraft:compass",
            ItemKind::Other(id) => id,
        }
    }

    /// Resolves a registry id, falling back to [`ItemKind::Other`].
    pub fn from_id(id: &str) -> Self {
        match id {
            "minecraft:air" => ItemKind::Air,
            ICON_ITEM_ID => ItemKind::IconItem,
            "minecraft:player_head" => ItemKind::PlayerHead,
            "minecraft:skeleton_skull" => ItemKind::SkeletonSkull,
            "minecraft:green_stained_glass" => ItemKind::GreenStainedGlass,
            "minecraft:gray_stained_glass" => ItemKind::GrayStainedGlass,
            "minecraft:red_stained_glass" => ItemKind::RedStainedGlass,
            "minecraft:chest" => ItemKind::Chest,
            "minecraft:tnt" => ItemKind::Tnt,
            "minecraft:shield" => ItemKind::Shield,
            "minecraft:potato" => ItemKind::Potato,
            "minecraft:paper" => ItemKind::Paper,
            "minecraft:arrow" => ItemKind::Arrow,
            "minecraft:barrier" => ItemKind::Barrier,
            "minecraft:lime_dye" => ItemKind::LimeDye,
            "minecraft:lava_bucket" => ItemKind::LavaBucket,
            "minecraft:book" => ItemKind::Book,
            "minecraft:compass" => ItemKind::Compass,
            other => ItemKind::Other(other.to_string()),
        }
    }
}
