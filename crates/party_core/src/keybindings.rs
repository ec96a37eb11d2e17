//! Keybinding registrations
//!
//! The host owns the keybinding registry; this module only describes
//! the actions it wants bound. Each party slot gets a toggle and a
//! find action. No default keys are suggested: with ten actions, key
//! choices are left to the table.

use schemars::JsonSchema;
use serde::Serialize;

use crate::slots::SlotId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum KeybindingKind {
    Toggle,
    Find,
}

/// One action the host should register in its keybinding UI.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct KeybindingSpec {
    /// Stable action id, e.g. `toggle3` or `find1`.
    pub action_id: String,
    pub kind: KeybindingKind,
    pub slot: SlotId,
    /// Localization id for the action label (slot-parameterized).
    pub label_key: &'static str,
    /// Suggested default key, if any.
    pub default_key: Option<String>,
}

/// All keybinding registrations, toggles first, then finds, each in
/// slot order.
pub fn default_keybindings() -> Vec<KeybindingSpec> {
    let mut specs = Vec::new();
    for slot in SlotId::all() {
        specs.push(KeybindingSpec {
            action_id: format!("toggle{}", slot),
            kind: KeybindingKind::Toggle,
            slot,
            label_key: "keybinding-toggle-label",
            default_key: None,
        });
    }
    for slot in SlotId::all() {
        specs.push(KeybindingSpec {
            action_id: format!("find{}", slot),
            kind: KeybindingKind::Find,
            slot,
            label_key: "keybinding-find-label",
            default_key: None,
        });
    }
    specs
}
