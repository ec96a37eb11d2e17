//! Module settings
//!
//! The host owns the settings store and the settings UI; this module
//! only declares what to register (key, scope, default, label keys)
//! and reads/writes values through the host adapter. Keys are
//! camelCased to match the host's settings conventions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::slots::SlotId;

/// Module identifier, used by the host to namespace settings and as
/// the chat speaker alias.
pub const MODULE_ID: &str = "party-crunch";
pub const MODULE_TITLE: &str = "Party Crunch";

pub const KEY_EXPLODE_STYLE: &str = "explodeStyle";
pub const KEY_HIDE_CHAT_INFO: &str = "hideChatInfo";
pub const KEY_DEBUG: &str = "debug";

/// Settings key holding the comma-separated member names of a slot.
pub fn member_names_key(slot: SlotId) -> String {
    format!("memberTokenNames{}", slot)
}

/// Settings key holding the party token name of a slot.
pub fn party_name_key(slot: SlotId) -> String {
    format!("partyTokenName{}", slot)
}

/// Where a setting is stored by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SettingScope {
    /// Shared by the whole game world, GM-editable.
    World,
    /// Per-client preference.
    Client,
}

/// One setting registration the host should perform on module setup.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SettingSpec {
    pub key: String,
    pub scope: SettingScope,
    pub default: String,
    /// Localization id for the setting label.
    pub label_key: &'static str,
    /// Localization id for the hint text below the label.
    pub hint_key: &'static str,
    /// Slot the setting belongs to, for slot-parameterized labels.
    pub slot: Option<SlotId>,
    /// Whether the host should show the setting in its config UI.
    pub config: bool,
}

/// Every setting this module registers, in display order: the five
/// member/party name pairs, then the module-wide toggles.
pub fn module_settings() -> Vec<SettingSpec> {
    let mut specs = Vec::new();
    for slot in SlotId::all() {
        specs.push(SettingSpec {
            key: member_names_key(slot),
            scope: SettingScope::World,
            default: String::new(),
            label_key: "setting-member-names-label",
            hint_key: "setting-member-names-hint",
            slot: Some(slot),
            config: true,
        });
        specs.push(SettingSpec {
            key: party_name_key(slot),
            scope: SettingScope::World,
            default: String::new(),
            label_key: "setting-party-name-label",
            hint_key: "setting-party-name-hint",
            slot: Some(slot),
            config: true,
        });
    }
    specs.push(SettingSpec {
        key: KEY_EXPLODE_STYLE.to_string(),
        scope: SettingScope::World,
        default: ExplodeStyle::Jump.as_setting().to_string(),
        label_key: "setting-explode-style-label",
        hint_key: "setting-explode-style-hint",
        slot: None,
        config: true,
    });
    specs.push(SettingSpec {
        key: KEY_HIDE_CHAT_INFO.to_string(),
        scope: SettingScope::World,
        default: "false".to_string(),
        label_key: "setting-hide-chat-info-label",
        hint_key: "setting-hide-chat-info-hint",
        slot: None,
        config: true,
    });
    specs.push(SettingSpec {
        key: KEY_DEBUG.to_string(),
        scope: SettingScope::Client,
        default: "false".to_string(),
        label_key: "setting-debug-label",
        hint_key: "setting-debug-hint",
        slot: None,
        config: true,
    });
    specs
}

/// How explode places member tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExplodeStyle {
    /// Instant placement at the target cells.
    #[default]
    Jump,
    /// Single-cell steps along the spread path, for hosts that animate
    /// token movement.
    Walk,
}

impl ExplodeStyle {
    /// Parse a stored setting value. Unknown values fall back to the
    /// default rather than failing a toggle over a typo.
    pub fn from_setting(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "walk" => ExplodeStyle::Walk,
            _ => ExplodeStyle::Jump,
        }
    }

    pub fn as_setting(self) -> &'static str {
        match self {
            ExplodeStyle::Jump => "jump",
            ExplodeStyle::Walk => "walk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_keys() {
        let slot = SlotId::new(2).unwrap();
        assert_eq!(member_names_key(slot), "memberTokenNames2");
        assert_eq!(party_name_key(slot), "partyTokenName2");
    }

    #[test]
    fn test_module_settings_cover_all_slots() {
        let specs = module_settings();
        assert_eq!(specs.len(), 13); // 5 slots x 2 + 3 module-wide

        let keys: Vec<&str> = specs.iter().map(|s| s.key.as_str()).collect();
        assert!(keys.contains(&"memberTokenNames1"));
        assert!(keys.contains(&"partyTokenName5"));
        assert!(keys.contains(&KEY_EXPLODE_STYLE));

        // only the debug flag is per-client
        let client: Vec<&str> = specs
            .iter()
            .filter(|s| s.scope == SettingScope::Client)
            .map(|s| s.key.as_str())
            .collect();
        assert_eq!(client, [KEY_DEBUG]);
    }

    #[test]
    fn test_explode_style_parsing() {
        assert_eq!(ExplodeStyle::from_setting("walk"), ExplodeStyle::Walk);
        assert_eq!(ExplodeStyle::from_setting(" WALK "), ExplodeStyle::Walk);
        assert_eq!(ExplodeStyle::from_setting("jump"), ExplodeStyle::Jump);
        assert_eq!(ExplodeStyle::from_setting("sprint"), ExplodeStyle::Jump);
        assert_eq!(ExplodeStyle::from_setting(""), ExplodeStyle::Jump);
    }
}
