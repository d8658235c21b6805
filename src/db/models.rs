/// Data models for persisted entities
///
/// Field names serialize to the camelCase keys the extension stores.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A single recorded code block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub value: String,
    pub id: String,
}

impl Block {
    /// Create a block with a freshly generated id
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            id: Uuid::new_v4().simple().to_string(),
        }
    }
}

/// Recording status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecState {
    #[default]
    Off,
    Paused,
    On,
    Settings,
}

impl RecState {
    /// Whether a recording session (active or paused) exists
    pub fn has_session(self) -> bool {
        matches!(self, RecState::On | RecState::Paused)
    }
}

impl fmt::Display for RecState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecState::Off => "off",
            RecState::Paused => "paused",
            RecState::On => "on",
            RecState::Settings => "settings",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RecState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(RecState::Off),
            "paused" => Ok(RecState::Paused),
            "on" => Ok(RecState::On),
            "settings" => Ok(RecState::Settings),
            other => Err(format!("unknown recording status '{}'", other)),
        }
    }
}

/// User settings
///
/// `waitXHR` and `flag` are the known switches; anything else a newer
/// popup stored is kept in `extra` so it survives a round trip.
/// A stored record missing a switch reads it as off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "waitXHR", default)]
    pub wait_xhr: bool,
    #[serde(default)]
    pub flag: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wait_xhr: false,
            flag: true,
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Set a switch by its stored name
    pub fn set(&mut self, name: &str, value: bool) {
        match name {
            "waitXHR" => self.wait_xhr = value,
            "flag" => self.flag = value,
            other => {
                self.extra.insert(other.to_string(), Value::Bool(value));
            }
        }
    }

    /// Read a switch by its stored name
    pub fn get(&self, name: &str) -> Option<bool> {
        match name {
            "waitXHR" => Some(self.wait_xhr),
            "flag" => Some(self.flag),
            other => self.extra.get(other).and_then(Value::as_bool),
        }
    }
}

/// One toggled switch submitted from the settings box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleSetting {
    pub name: String,
    pub value: bool,
}

/// Keys of the key-value store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Status,
    CodeBlocks,
    Settings,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [StorageKey::Status, StorageKey::CodeBlocks, StorageKey::Settings];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Status => "status",
            StorageKey::CodeBlocks => "codeBlocks",
            StorageKey::Settings => "settings",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial record read from or written to the key-value store
///
/// `None` means the key is absent (on read) or untouched (on write).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageItems {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_blocks: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl StorageItems {
    /// Keys carrying a value
    pub fn keys(&self) -> Vec<StorageKey> {
        let mut keys = Vec::new();
        if self.status.is_some() {
            keys.push(StorageKey::Status);
        }
        if self.code_blocks.is_some() {
            keys.push(StorageKey::CodeBlocks);
        }
        if self.settings.is_some() {
            keys.push(StorageKey::Settings);
        }
        keys
    }

    /// Copy only the requested keys
    pub fn select(&self, keys: &[StorageKey]) -> StorageItems {
        StorageItems {
            status: self.status.filter(|_| keys.contains(&StorageKey::Status)),
            code_blocks: self
                .code_blocks
                .clone()
                .filter(|_| keys.contains(&StorageKey::CodeBlocks)),
            settings: self
                .settings
                .clone()
                .filter(|_| keys.contains(&StorageKey::Settings)),
        }
    }

    /// Overwrite keys present in `other`, leaving the rest intact
    pub fn merge(&mut self, other: StorageItems) {
        if let Some(status) = other.status {
            self.status = Some(status);
        }
        if let Some(blocks) = other.code_blocks {
            self.code_blocks = Some(blocks);
        }
        if let Some(settings) = other.settings {
            self.settings = Some(settings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_ids_are_unique() {
        let a = Block::new("a");
        let b = Block::new("a");
        assert_eq!(a.value, b.value);
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }

    #[test]
    fn test_rec_state_strings() {
        assert_eq!(serde_json::to_string(&RecState::Paused).unwrap(), "\"paused\"");
        assert_eq!("settings".parse::<RecState>().unwrap(), RecState::Settings);
        assert!("recording".parse::<RecState>().is_err());
        assert_eq!(RecState::On.to_string(), "on");
    }

    #[test]
    fn test_settings_keep_unknown_keys() {
        let settings: Settings =
            serde_json::from_value(json!({ "waitXHR": true, "flag": false, "darkMode": true }))
                .unwrap();
        assert!(settings.wait_xhr);
        assert!(!settings.flag);
        assert_eq!(settings.get("darkMode"), Some(true));

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value, json!({ "waitXHR": true, "flag": false, "darkMode": true }));
    }

    #[test]
    fn test_stored_settings_missing_switches_read_as_off() {
        let settings: Settings = serde_json::from_value(json!({ "waitXHR": true })).unwrap();
        assert!(settings.wait_xhr);
        assert!(!settings.flag);

        // a fresh record still starts with flag on
        assert!(Settings::default().flag);
    }

    #[test]
    fn test_settings_set_by_name() {
        let mut settings = Settings::default();
        settings.set("waitXHR", true);
        settings.set("autoScroll", false);

        assert!(settings.wait_xhr);
        assert!(settings.flag);
        assert_eq!(settings.get("autoScroll"), Some(false));
        assert_eq!(settings.get("missing"), None);
    }

    #[test]
    fn test_storage_items_merge_and_select() {
        let mut items = StorageItems {
            status: Some(RecState::On),
            code_blocks: Some(vec![Block::new("x")]),
            settings: None,
        };
        items.merge(StorageItems {
            status: Some(RecState::Off),
            ..Default::default()
        });

        assert_eq!(items.status, Some(RecState::Off));
        assert_eq!(items.code_blocks.as_ref().map(Vec::len), Some(1));

        let selected = items.select(&[StorageKey::Status, StorageKey::Settings]);
        assert_eq!(selected.keys(), vec![StorageKey::Status]);
    }
}
