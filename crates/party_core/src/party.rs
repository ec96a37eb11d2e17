//! Party orchestration
//!
//! `PartyModule` ties the pieces together: it reads slot settings
//! through the host adapter, validates and persists them, resolves
//! tokens, determines the toggle direction and drives the placement
//! and visibility choreography. One operation runs at a time; a second
//! request while one is in flight fails with `OperationBusy` and is
//! dropped, never queued. There is no rollback: a host failure mid
//! choreography aborts and is reported, the scene keeps whatever state
//! it reached.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

use crate::action::{PartyAction, PartyPhase};
use crate::chat;
use crate::error::{PartyError, Result};
use crate::hooks::{EventPayload, HookRegistry, ModuleEvent};
use crate::host::{HostAdapter, NotifyLevel};
use crate::localization::Localizer;
use crate::resolver::TokenResolver;
use crate::roster::{RosterValidator, ValidatedRoster};
use crate::scene::{GridPos, InvolvedTokens, SceneToken};
use crate::settings::{
    member_names_key, party_name_key, ExplodeStyle, KEY_EXPLODE_STYLE, KEY_HIDE_CHAT_INFO,
};
use crate::slots::{SlotDirectory, SlotId};
use crate::spread;

/// Outcome of a successful toggle.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ToggleReport {
    pub op_id: Uuid,
    pub slot: SlotId,
    pub action: PartyAction,
    pub party_name: String,
    pub member_count: usize,
    /// Anchor cell the view was panned to.
    pub focus: GridPos,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a successful group.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GroupReport {
    pub op_id: Uuid,
    pub slot: SlotId,
    pub party_name: String,
    pub member_names: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a successful find.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FindReport {
    pub op_id: Uuid,
    pub slot: SlotId,
    pub phase: PartyPhase,
    pub party_name: String,
    /// Tokens put into the GM's selection.
    pub selected: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// One or both name settings are blank.
    NotConfigured,
    /// Names validate and resolve against the active scene.
    Ready,
    /// Configured, but validation/resolution/classification fails.
    Degraded,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SlotHealth {
    pub slot: SlotId,
    pub status: SlotStatus,
    /// Technical detail for degraded slots.
    pub detail: Option<String>,
    pub party_name: Option<String>,
    pub member_count: Option<usize>,
    pub phase: Option<PartyPhase>,
    pub last_used: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct HealthReport {
    pub module_version: String,
    pub locale: String,
    pub slots: Vec<SlotHealth>,
}

/// The module itself: one instance per host connection.
pub struct PartyModule<H: HostAdapter> {
    host: H,
    slots: SlotDirectory,
    hooks: HookRegistry,
    localizer: Localizer,
    busy: Arc<Mutex<()>>,
}

impl<H: HostAdapter> PartyModule<H> {
    pub fn new(host: H) -> Self {
        let localizer = Localizer::for_locale(&host.requested_locale());
        Self {
            host,
            slots: SlotDirectory::new(),
            hooks: HookRegistry::new(),
            localizer,
            busy: Arc::new(Mutex::new(())),
        }
    }

    /// One-time startup: post the welcome card (unless suppressed) and
    /// announce readiness to subscribers. The card is posted once per
    /// world; posting flips the `hideChatInfo` setting.
    pub fn startup(&mut self) -> Result<()> {
        let hide = self
            .host
            .get_setting(KEY_HIDE_CHAT_INFO)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if !hide {
            let card = chat::welcome_card(&self.localizer);
            self.host.post_chat(&card)?;
            self.host.set_setting(KEY_HIDE_CHAT_INFO, "true")?;
        }
        self.hooks.emit(&EventPayload::bare(ModuleEvent::Ready));
        log::info!("party module ready (locale {})", self.localizer.current_locale());
        Ok(())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn is_busy(&self) -> bool {
        self.busy.try_lock().is_err()
    }

    // ========================
    // Operations
    // ========================

    /// Crunch an exploded party, or explode a crunched one.
    pub fn toggle(&mut self, slot: SlotId) -> Result<ToggleReport> {
        let outcome = self.guarded(|module| module.toggle_inner(slot));
        self.surface_error(slot, &outcome);
        outcome
    }

    /// Turn the GM's current token selection into the members of
    /// `slot`, under the given party token name.
    pub fn group(&mut self, slot: SlotId, party_name: &str) -> Result<GroupReport> {
        let outcome = self.guarded(|module| module.group_inner(slot, party_name));
        self.surface_error(slot, &outcome);
        outcome
    }

    /// Select and focus whichever side of the party is on stage,
    /// without touching position or visibility.
    pub fn find(&mut self, slot: SlotId) -> Result<FindReport> {
        let outcome = self.guarded(|module| module.find_inner(slot));
        self.surface_error(slot, &outcome);
        outcome
    }

    /// Per-slot configuration and scene-binding status. Never fails;
    /// problems are reported per slot.
    pub fn health_check(&self) -> HealthReport {
        let owned = self.host.owned_tokens();
        let slots = SlotId::all()
            .map(|slot| self.slot_health(slot, &owned))
            .collect();
        HealthReport {
            module_version: crate::VERSION.to_string(),
            locale: self.localizer.current_locale().to_string(),
            slots,
        }
    }

    // ========================
    // Internals
    // ========================

    /// Serialize operations: only one may run at a time.
    fn guarded<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let busy = Arc::clone(&self.busy);
        let _guard = busy.try_lock().map_err(|_| PartyError::OperationBusy)?;
        op(self)
    }

    /// Every failed operation surfaces exactly one localized
    /// notification; nothing is retried.
    fn surface_error<T>(&mut self, slot: SlotId, outcome: &Result<T>) {
        if let Err(err) = outcome {
            log::warn!("party operation failed on slot {}: {} ({})", slot, err, err.code());
            let text = self.localizer.error_message(err);
            self.host.notify(NotifyLevel::Error, &text);
        }
    }

    /// Read, validate and canonicalize a slot's name settings,
    /// persisting the cleaned values back to the host store.
    fn load_roster(&mut self, slot: SlotId, persist: bool) -> Result<ValidatedRoster> {
        let members_raw = self.host.get_setting(&member_names_key(slot)).unwrap_or_default();
        let party_raw = self.host.get_setting(&party_name_key(slot)).unwrap_or_default();
        let roster = RosterValidator::validate(&members_raw, &party_raw)?;

        if persist {
            self.host.set_setting(&member_names_key(slot), &roster.member_csv())?;
            self.host.set_setting(&party_name_key(slot), roster.party_name())?;
        }

        let entry = self.slots.get_mut(slot);
        entry.member_names_raw = roster.member_csv();
        entry.party_name_raw = roster.party_name().to_string();
        Ok(roster)
    }

    fn explode_style(&self) -> ExplodeStyle {
        self.host
            .get_setting(KEY_EXPLODE_STYLE)
            .map(|v| ExplodeStyle::from_setting(&v))
            .unwrap_or_default()
    }

    fn toggle_inner(&mut self, slot: SlotId) -> Result<ToggleReport> {
        let op_id = Uuid::new_v4();
        let roster = self.load_roster(slot, true)?;
        let involved = TokenResolver::resolve(&roster, &self.host.owned_tokens())?;
        let phase = PartyPhase::classify(&involved)?;
        let action = phase.toggle_action();
        let style = self.explode_style();

        let first_member = involved
            .members
            .first()
            .cloned()
            .expect("validated roster resolves at least one member");

        let (anchor, target) = match action {
            PartyAction::Explode => (involved.party.pos, involved.party.clone()),
            PartyAction::Crunch => (first_member.pos, first_member),
        };

        log::debug!(
            "toggle {}: {} party '{}' around {} ({} members, {:?})",
            op_id,
            action,
            roster.party_name(),
            anchor,
            involved.members.len(),
            style
        );

        match action {
            PartyAction::Explode => {
                self.place_exploded(&involved, anchor, style)?;
                for member in &involved.members {
                    self.host.update_hidden(&member.id, false)?;
                }
                self.host.update_hidden(&involved.party.id, true)?;
            }
            PartyAction::Crunch => {
                self.place_crunched(&involved, anchor, style)?;
                for member in &involved.members {
                    self.host.update_hidden(&member.id, true)?;
                }
                self.host.update_hidden(&involved.party.id, false)?;
            }
        }

        self.host.select_tokens(&[target.id.clone()])?;
        self.host.pan_to(anchor)?;

        let card = chat::toggle_report(&self.localizer, action, &roster);
        self.host.post_chat(&card)?;

        self.slots.get_mut(slot).touch();
        let event = match action {
            PartyAction::Crunch => ModuleEvent::PartyCrunched,
            PartyAction::Explode => ModuleEvent::PartyExploded,
        };
        self.hooks.emit(&EventPayload {
            event,
            slot: Some(slot),
            party_name: Some(roster.party_name().to_string()),
            op_id: Some(op_id),
        });
        log::info!(
            "toggle {}: {} done for party '{}' on slot {}",
            op_id,
            action,
            roster.party_name(),
            slot
        );

        Ok(ToggleReport {
            op_id,
            slot,
            action,
            party_name: roster.party_name().to_string(),
            member_count: roster.member_count(),
            focus: anchor,
            timestamp: Utc::now(),
        })
    }

    /// Fan members out around the anchor, one spread cell each.
    fn place_exploded(
        &mut self,
        involved: &InvolvedTokens,
        anchor: GridPos,
        style: ExplodeStyle,
    ) -> Result<()> {
        for (index, member) in involved.members.iter().enumerate() {
            let offset = spread::offset(index).ok_or(PartyError::TooManyMembers {
                count: involved.members.len(),
                max: spread::MAX_PARTY_SIZE,
            })?;
            match style {
                ExplodeStyle::Jump => {
                    self.host.update_position(&member.id, anchor.offset_by(offset))?;
                }
                ExplodeStyle::Walk => {
                    // start the walk on the anchor, then step outwards
                    let mut pos = anchor;
                    self.host.update_position(&member.id, pos)?;
                    for step in spread::walk_path(index) {
                        pos = pos.offset_by(step);
                        self.host.update_position(&member.id, pos)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Collapse members (and the party token) onto the anchor.
    fn place_crunched(
        &mut self,
        involved: &InvolvedTokens,
        anchor: GridPos,
        style: ExplodeStyle,
    ) -> Result<()> {
        for member in &involved.members {
            match style {
                ExplodeStyle::Jump => {
                    self.host.update_position(&member.id, anchor)?;
                }
                ExplodeStyle::Walk => {
                    let mut pos = member.pos;
                    for step in spread::steps_toward(pos.delta_to(anchor)) {
                        pos = pos.offset_by(step);
                        self.host.update_position(&member.id, pos)?;
                    }
                }
            }
        }
        self.host.update_position(&involved.party.id, anchor)?;
        Ok(())
    }

    fn group_inner(&mut self, slot: SlotId, party_name: &str) -> Result<GroupReport> {
        let op_id = Uuid::new_v4();
        let selection = self.host.selected_tokens();
        let member_csv =
            selection.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ");
        let roster = RosterValidator::validate(&member_csv, party_name)?;

        self.host.set_setting(&member_names_key(slot), &roster.member_csv())?;
        self.host.set_setting(&party_name_key(slot), roster.party_name())?;
        let entry = self.slots.get_mut(slot);
        entry.member_names_raw = roster.member_csv();
        entry.party_name_raw = roster.party_name().to_string();
        entry.touch();

        let card = chat::group_report(&self.localizer, &roster);
        self.host.post_chat(&card)?;
        self.hooks.emit(&EventPayload {
            event: ModuleEvent::PartyGrouped,
            slot: Some(slot),
            party_name: Some(roster.party_name().to_string()),
            op_id: Some(op_id),
        });
        log::info!(
            "group {}: slot {} now holds {} members under '{}'",
            op_id,
            slot,
            roster.member_count(),
            roster.party_name()
        );

        Ok(GroupReport {
            op_id,
            slot,
            party_name: roster.party_name().to_string(),
            member_names: roster.member_names().to_vec(),
            timestamp: Utc::now(),
        })
    }

    fn find_inner(&mut self, slot: SlotId) -> Result<FindReport> {
        let op_id = Uuid::new_v4();
        let roster = self.load_roster(slot, false)?;
        let involved = TokenResolver::resolve(&roster, &self.host.owned_tokens())?;
        let phase = PartyPhase::classify(&involved)?;

        let (ids, focus) = match phase {
            PartyPhase::Crunched => {
                (vec![involved.party.id.clone()], involved.party.pos)
            }
            PartyPhase::Exploded => {
                let visible = involved.visible_member_ids();
                let focus = involved
                    .members
                    .iter()
                    .find(|t| t.is_visible())
                    .map(|t| t.pos)
                    .expect("exploded phase has a visible member");
                (visible, focus)
            }
        };
        let selected = ids.len();
        self.host.select_tokens(&ids)?;
        self.host.pan_to(focus)?;

        let card = chat::find_report(&self.localizer, phase, &roster);
        self.host.post_chat(&card)?;

        self.slots.get_mut(slot).touch();
        self.hooks.emit(&EventPayload {
            event: ModuleEvent::PartyFound,
            slot: Some(slot),
            party_name: Some(roster.party_name().to_string()),
            op_id: Some(op_id),
        });
        log::info!("find {}: party '{}' is {} on slot {}", op_id, roster.party_name(), phase, slot);

        Ok(FindReport {
            op_id,
            slot,
            phase,
            party_name: roster.party_name().to_string(),
            selected,
            timestamp: Utc::now(),
        })
    }

    fn slot_health(&self, slot: SlotId, owned: &[SceneToken]) -> SlotHealth {
        let entry = self.slots.get(slot);
        let members_raw = self.host.get_setting(&member_names_key(slot)).unwrap_or_default();
        let party_raw = self.host.get_setting(&party_name_key(slot)).unwrap_or_default();

        if members_raw.trim().is_empty() && party_raw.trim().is_empty() {
            return SlotHealth {
                slot,
                status: SlotStatus::NotConfigured,
                detail: None,
                party_name: None,
                member_count: None,
                phase: None,
                last_used: entry.last_used,
            };
        }

        let bound = RosterValidator::validate(&members_raw, &party_raw).and_then(|roster| {
            let involved = TokenResolver::resolve(&roster, owned)?;
            let phase = PartyPhase::classify(&involved)?;
            Ok((roster, phase))
        });
        match bound {
            Ok((roster, phase)) => SlotHealth {
                slot,
                status: SlotStatus::Ready,
                detail: None,
                party_name: Some(roster.party_name().to_string()),
                member_count: Some(roster.member_count()),
                phase: Some(phase),
                last_used: entry.last_used,
            },
            Err(err) => SlotHealth {
                slot,
                status: SlotStatus::Degraded,
                detail: Some(err.to_string()),
                party_name: None,
                member_count: None,
                phase: None,
                last_used: entry.last_used,
            },
        }
    }
}
