//! Toggle state machine
//!
//! The current phase is read from the scene's `hidden` flags on every
//! invocation; nothing is cached between calls. A visible party token
//! means the party is crunched, a hidden party token with at least one
//! visible member means it is exploded, and a scene with everything
//! hidden is unresolvable. A scene where party and members are all
//! visible still classifies as crunched; toggling it explodes, which
//! re-places the members and hides the party token.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PartyError, Result};
use crate::scene::InvolvedTokens;

/// Observed party phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PartyPhase {
    /// Party token visible, members collapsed into it.
    Crunched,
    /// Members visible, party token hidden.
    Exploded,
}

/// Action a toggle performs, the inverse of the observed phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PartyAction {
    Crunch,
    Explode,
}

impl PartyPhase {
    /// Classify a scene binding by its visibility flags.
    pub fn classify(involved: &InvolvedTokens) -> Result<PartyPhase> {
        if involved.party.is_visible() {
            Ok(PartyPhase::Crunched)
        } else if involved.any_member_visible() {
            Ok(PartyPhase::Exploded)
        } else {
            Err(PartyError::InvalidVisibilityState)
        }
    }

    /// The action a toggle performs from this phase.
    pub fn toggle_action(self) -> PartyAction {
        match self {
            PartyPhase::Crunched => PartyAction::Explode,
            PartyPhase::Exploded => PartyAction::Crunch,
        }
    }
}

impl std::fmt::Display for PartyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartyPhase::Crunched => write!(f, "crunched"),
            PartyPhase::Exploded => write!(f, "exploded"),
        }
    }
}

impl std::fmt::Display for PartyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartyAction::Crunch => write!(f, "crunch"),
            PartyAction::Explode => write!(f, "explode"),
        }
    }
}
