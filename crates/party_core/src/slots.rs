//! Party slots
//!
//! Five independent configuration slots, each holding the two raw
//! name strings as stored in the host settings store. Runtime slot
//! state lives in an explicit directory map owned by the module, not
//! in statics.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PartyError, Result};

/// Number of independently configurable parties.
pub const SLOT_COUNT: u8 = 5;

/// Validated slot number, 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SlotId(u8);

impl SlotId {
    pub fn new(slot: u8) -> Result<Self> {
        if (1..=SLOT_COUNT).contains(&slot) {
            Ok(SlotId(slot))
        } else {
            Err(PartyError::InvalidSlot { slot })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All valid slots in ascending order.
    pub fn all() -> impl Iterator<Item = SlotId> {
        (1..=SLOT_COUNT).map(SlotId)
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One party configuration slot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PartySlot {
    pub slot: SlotId,
    /// Raw comma-separated member names, exactly as stored in settings.
    pub member_names_raw: String,
    /// Raw party token name, exactly as stored in settings.
    pub party_name_raw: String,
    /// Last successful group/toggle/find against this slot.
    pub last_used: Option<DateTime<Utc>>,
}

impl PartySlot {
    pub fn new(slot: SlotId) -> Self {
        Self { slot, member_names_raw: String::new(), party_name_raw: String::new(), last_used: None }
    }

    /// A slot counts as configured once both name settings are
    /// non-blank; whether they validate is a separate question.
    pub fn is_configured(&self) -> bool {
        !self.member_names_raw.trim().is_empty() && !self.party_name_raw.trim().is_empty()
    }

    pub fn touch(&mut self) {
        self.last_used = Some(Utc::now());
    }
}

/// Slot id → slot value map, pre-populated for all five slots.
#[derive(Debug, Clone)]
pub struct SlotDirectory {
    slots: HashMap<SlotId, PartySlot>,
}

impl Default for SlotDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotDirectory {
    pub fn new() -> Self {
        Self { slots: SlotId::all().map(|id| (id, PartySlot::new(id))).collect() }
    }

    pub fn get(&self, id: SlotId) -> &PartySlot {
        &self.slots[&id]
    }

    pub fn get_mut(&mut self, id: SlotId) -> &mut PartySlot {
        self.slots.get_mut(&id).expect("directory holds every valid slot")
    }

    /// Slots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &PartySlot> {
        SlotId::all().map(|id| self.get(id))
    }
}
