//! Driver configuration
//!
//! Stored as TOML, by default at `~/.config/metec/driver.toml`. A missing file
//! means defaults; every key is optional.
//!
//! `[labels]` maps gesture identifiers (`fk1+fk3`, `routing`, `fk2+r38`) to a
//! human-readable description. `metec watch` treats a labelled gesture as
//! bound and everything else as unbound. Keys may list the keys in any order
//! (`fk2+ckl`); they are normalized on load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use metec_braille::{
    canonical_id, CalibrationMode, SessionOptions, StatusCellPolicy, DEFAULT_POLL_INTERVAL,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Persistent driver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Key poll period in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Status cell reservation: "auto", "none" or "two"
    #[serde(
        default,
        serialize_with = "serialize_policy",
        deserialize_with = "deserialize_policy"
    )]
    pub status_cells: StatusCellPolicy,
    /// Fixed function-key mask; learned from the first read when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_mask: Option<u16>,
    /// Report gestures nothing handled
    #[serde(default = "default_true")]
    pub announce_unbound: bool,
    /// Gesture identifier to description
    #[serde(default = "default_labels", deserialize_with = "deserialize_labels")]
    pub labels: BTreeMap<String, String>,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_true() -> bool {
    true
}

/// Stock layout of the BD-20/BD-40 key set
fn default_labels() -> BTreeMap<String, String> {
    [
        ("fk2+r00", "toggle braille tether"),
        ("fk1", "previous braille line"),
        ("fk4", "previous braille line"),
        ("fk2", "scroll braille back"),
        ("fk3", "next braille line"),
        ("fk6", "next braille line"),
        ("fk5", "scroll braille forward"),
        ("routing", "route to cell"),
        ("ckl", "left arrow"),
        ("cku", "up arrow"),
        ("ckr", "right arrow"),
        ("ckd", "down arrow"),
        ("fk1+fk3", "home"),
        ("fk1+fk2+fk3", "control+home"),
        ("fk4+fk6", "end"),
        ("fk4+fk5+fk6", "control+end"),
        ("ckl+fk2", "review previous word"),
        ("cku+fk2", "review previous line"),
        ("ckr+fk2", "review next word"),
        ("ckd+fk2", "review next line"),
        ("fk2+r38", "battery status"),
        ("fk2+r39", "show menu"),
    ]
    .into_iter()
    .map(|(id, label)| (id.to_string(), label.to_string()))
    .collect()
}

fn deserialize_labels<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let labels = BTreeMap::<String, String>::deserialize(d)?;
    Ok(labels
        .into_iter()
        .map(|(id, label)| (canonical_id(&id), label))
        .collect())
}

fn serialize_policy<S: Serializer>(policy: &StatusCellPolicy, s: S) -> Result<S::Ok, S::Error> {
    let name = match policy {
        StatusCellPolicy::Auto => "auto",
        StatusCellPolicy::None => "none",
        StatusCellPolicy::Two => "two",
    };
    s.serialize_str(name)
}

fn deserialize_policy<'de, D: Deserializer<'de>>(d: D) -> Result<StatusCellPolicy, D::Error> {
    let name = String::deserialize(d)?;
    name.parse().map_err(serde::de::Error::custom)
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            status_cells: StatusCellPolicy::Auto,
            key_mask: None,
            announce_unbound: true,
            labels: default_labels(),
        }
    }
}

impl DriverConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("metec")
            .join("driver.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: DriverConfig = toml::from_str(content)?;
        if config.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than zero");
        }
        Ok(config)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Description bound to a gesture identifier
    pub fn label(&self, gesture_id: &str) -> Option<&str> {
        self.labels.get(gesture_id).map(String::as_str)
    }

    /// Session settings derived from this config
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            status_cells: self.status_cells,
            calibration: match self.key_mask {
                Some(mask) => CalibrationMode::Fixed(mask),
                None => CalibrationMode::LearnOnFirstRead,
            },
        }
    }
}
