//! TOML configuration for the shim.
//!
//! Read from `bedrock-graves.toml` in the working directory, or from the path
//! in the `BEDROCK_GRAVES_CONFIG` environment variable.  Every field has a
//! default, so an absent file or a partial one is fine.
//!
//! ```toml
//! [general]
//! log_level = "debug"
//! restricted_viewers = ["6f1c2a4e-9d3b-4c71-8e55-2b0f3a9c7d10"]
//!
//! [overlay]
//! update_period_ticks = 5
//! hide_delay_ms = 200
//! max_distance = 32.0
//!
//! [label]
//! infinity_text = "never"
//!
//! [[demo_graves]]
//! world = "minecraft:overworld"
//! x = 10
//! y = 64
//! z = -4
//! owner = "Steve"
//! items = ["minecraft:apple"]
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bedrock_graves_core::domain::label::LabelFormat;
use bedrock_graves_core::protocol::synthetic::OverlayGeometry;
use bedrock_graves_core::{GraveSnapshot, ItemKind, ItemStack, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::application::overlay_engine::OverlaySettings;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "BEDROCK_GRAVES_CONFIG";

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "bedrock-graves.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of its allowed range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub label: LabelConfig,
    /// Graves created at startup by the headless binary.
    #[serde(default)]
    pub demo_graves: Vec<DemoGrave>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Viewers the built-in static oracle reports as restricted.
    #[serde(default)]
    pub restricted_viewers: Vec<Uuid>,
}

/// Overlay timing and placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    #[serde(default = "default_update_period_ticks")]
    pub update_period_ticks: u64,
    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,
    #[serde(default = "default_respawn_interval_ms")]
    pub respawn_interval_ms: u64,
    #[serde(default = "default_disguise_interval_ms")]
    pub disguise_interval_ms: u64,
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,
    #[serde(default = "default_grace_distance")]
    pub grace_distance: f64,
    #[serde(default = "default_label_offset_y")]
    pub label_offset_y: f64,
    #[serde(default = "default_prop_offset_x")]
    pub prop_offset_x: f64,
    #[serde(default = "default_prop_offset_y")]
    pub prop_offset_y: f64,
    #[serde(default)]
    pub prop_offset_z: f64,
    #[serde(default = "default_equip_delay_ticks")]
    pub equip_delay_ticks: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelConfig {
    /// Shown instead of a countdown that never ends.
    #[serde(default = "default_infinity_text")]
    pub infinity_text: String,
}

/// A grave placed at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemoGrave {
    #[serde(default = "default_world")]
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub owner: String,
    #[serde(default)]
    pub death_cause: Option<String>,
    #[serde(default)]
    pub xp: u32,
    /// Registry ids of stored items, one stack each.
    #[serde(default)]
    pub items: Vec<String>,
}

impl DemoGrave {
    /// The grave this entry describes.  Protection and breaking never expire.
    pub fn snapshot(&self) -> GraveSnapshot {
        GraveSnapshot {
            owner_name: Some(self.owner.clone()),
            death_cause: self.death_cause.clone(),
            items: self
                .items
                .iter()
                .map(|id| ItemStack::new(ItemKind::from_id(id), 1))
                .collect(),
            xp: self.xp,
            ..GraveSnapshot::default()
        }
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_update_period_ticks() -> u64 {
    5
}
fn default_hide_delay_ms() -> u64 {
    200
}
fn default_respawn_interval_ms() -> u64 {
    30_000
}
fn default_disguise_interval_ms() -> u64 {
    1_000
}
fn default_max_distance() -> f64 {
    48.0
}
fn default_grace_distance() -> f64 {
    2.0
}
fn default_label_offset_y() -> f64 {
    1.0
}
fn default_prop_offset_x() -> f64 {
    0.45
}
fn default_prop_offset_y() -> f64 {
    -0.14
}
fn default_equip_delay_ticks() -> u64 {
    2
}
fn default_infinity_text() -> String {
    "\u{221e}".to_string()
}
fn default_world() -> String {
    "minecraft:overworld".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            restricted_viewers: Vec::new(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            update_period_ticks: default_update_period_ticks(),
            hide_delay_ms: default_hide_delay_ms(),
            respawn_interval_ms: default_respawn_interval_ms(),
            disguise_interval_ms: default_disguise_interval_ms(),
            max_distance: default_max_distance(),
            grace_distance: default_grace_distance(),
            label_offset_y: default_label_offset_y(),
            prop_offset_x: default_prop_offset_x(),
            prop_offset_y: default_prop_offset_y(),
            prop_offset_z: 0.0,
            equip_delay_ticks: default_equip_delay_ticks(),
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            infinity_text: default_infinity_text(),
        }
    }
}

impl OverlayConfig {
    /// Rejects values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_period_ticks == 0 {
            return Err(invalid("overlay.update_period_ticks", "must be at least 1"));
        }
        if self.respawn_interval_ms == 0 {
            return Err(invalid("overlay.respawn_interval_ms", "must be positive"));
        }
        if self.disguise_interval_ms == 0 {
            return Err(invalid("overlay.disguise_interval_ms", "must be positive"));
        }
        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(invalid("overlay.max_distance", "must be a positive number"));
        }
        if !(self.grace_distance.is_finite() && self.grace_distance >= 0.0) {
            return Err(invalid("overlay.grace_distance", "must not be negative"));
        }
        if self.grace_distance > self.max_distance {
            return Err(invalid(
                "overlay.grace_distance",
                "must not exceed overlay.max_distance",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

impl AppConfig {
    /// Engine settings derived from `[overlay]` and `[label]`.
    pub fn overlay_settings(&self) -> OverlaySettings {
        let o = &self.overlay;
        OverlaySettings {
            update_period_ticks: o.update_period_ticks,
            hide_delay: Duration::from_millis(o.hide_delay_ms),
            respawn_interval: Duration::from_millis(o.respawn_interval_ms),
            disguise_interval: Duration::from_millis(o.disguise_interval_ms),
            max_distance: o.max_distance,
            grace_distance: o.grace_distance,
            equip_delay_ticks: o.equip_delay_ticks,
            geometry: OverlayGeometry {
                label_offset_y: o.label_offset_y,
                prop_offset: Vec3::new(o.prop_offset_x, o.prop_offset_y, o.prop_offset_z),
            },
            label: LabelFormat {
                infinity_text: self.label.infinity_text.clone(),
            },
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// The config file location: `$BEDROCK_GRAVES_CONFIG` or the default name.
pub fn config_file_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Parses TOML text into an `AppConfig`.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_overlay_matches_engine_defaults() {
        // Arrange / Act
        let settings = AppConfig::default().overlay_settings();

        // Assert
        assert_eq!(settings, OverlaySettings::default());
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg = parse_config("").expect("parse");
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.general.log_level, "info");
        assert_eq!(cfg.label.infinity_text, "\u{221e}");
    }

    #[test]
    fn test_partial_overlay_section_keeps_other_defaults() {
        // Arrange
        let toml_str = r#"
            [overlay]
            hide_delay_ms = 500
            max_distance = 32.0
        "#;

        // Act
        let cfg = parse_config(toml_str).expect("parse");

        // Assert
        assert_eq!(cfg.overlay.hide_delay_ms, 500);
        assert_eq!(cfg.overlay.max_distance, 32.0);
        assert_eq!(cfg.overlay.update_period_ticks, 5);
        assert_eq!(cfg.overlay.respawn_interval_ms, 30_000);
        assert_eq!(
            cfg.overlay_settings().hide_delay,
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_restricted_viewers_and_demo_graves_parse() {
        let toml_str = r#"
            [general]
            restricted_viewers = ["6f1c2a4e-9d3b-4c71-8e55-2b0f3a9c7d10"]

            [[demo_graves]]
            x = 1
            y = 64
            z = 2
            owner = "Alex"
        "#;

        let cfg = parse_config(toml_str).expect("parse");

        assert_eq!(cfg.general.restricted_viewers.len(), 1);
        assert_eq!(cfg.demo_graves.len(), 1);
        assert_eq!(cfg.demo_graves[0].world, "minecraft:overworld");
        assert_eq!(cfg.demo_graves[0].xp, 0);
    }

    #[test]
    fn test_demo_grave_snapshot_resolves_item_ids() {
        // Arrange
        let toml_str = r#"
            [[demo_graves]]
            x = 0
            y = 64
            z = 0
            owner = "Steve"
            xp = 30
            items = ["minecraft:compass", "minecraft:apple"]
        "#;
        let cfg = parse_config(toml_str).expect("parse");

        // Act
        let snapshot = cfg.demo_graves[0].snapshot();

        // Assert
        assert_eq!(snapshot.owner_name.as_deref(), Some("Steve"));
        assert_eq!(snapshot.xp, 30);
        assert_eq!(snapshot.items[0].kind, ItemKind::Compass);
        assert_eq!(
            snapshot.items[1].kind,
            ItemKind::Other("minecraft:apple".into())
        );
        assert!(snapshot.protection_left.is_none() && snapshot.breaking_left.is_none());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = parse_config("[overlay\nhide_delay_ms = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("bedrock-graves-{}.toml", Uuid::new_v4()));
        let cfg = load_config(&path).expect("missing file is not an error");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_load_config_reads_file() {
        let path = std::env::temp_dir().join(format!("bedrock-graves-{}.toml", Uuid::new_v4()));
        std::fs::write(&path, "[label]\ninfinity_text = \"forever\"\n").expect("write");

        let cfg = load_config(&path).expect("load");
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.label.infinity_text, "forever");
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(OverlayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_update_period() {
        let cfg = OverlayConfig {
            update_period_ticks: 0,
            ..OverlayConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid {
                field: "overlay.update_period_ticks",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_grace_beyond_max_distance() {
        let cfg = OverlayConfig {
            grace_distance: 60.0,
            ..OverlayConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid {
                field: "overlay.grace_distance",
                ..
            })
        ));
    }
}
