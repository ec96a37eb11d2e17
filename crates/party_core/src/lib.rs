//! # party_core - Party Token Crunching for Virtual Tabletops
//!
//! This library lets a game master collapse a group of on-screen
//! member tokens into a single party token and explode them back onto
//! the scene, with up to five independently named parties of up to 25
//! members each.
//!
//! ## Features
//! - Name-list validation with a classified error taxonomy
//! - Hand-authored 25-cell spread pattern (inner + outer ring)
//! - Visibility-driven toggle state machine, no retained state
//! - JSON API for easy integration with game-client macros
//!
//! The game client itself stays external: everything durable (settings,
//! scene tokens, chat) is reached through the [`host::HostAdapter`]
//! trait. [`host::MemoryHost`] ships as the in-memory reference
//! implementation for tests and tooling.

pub mod action;
pub mod api;
pub mod chat;
pub mod error;
pub mod hooks;
pub mod host;
pub mod keybindings;
pub mod localization;
pub mod party;
pub mod resolver;
pub mod roster;
pub mod scene;
pub mod settings;
pub mod slots;
pub mod spread;

// Re-export main API functions
pub use api::{find_party_json, group_party_json, health_check_json, toggle_party_json};
pub use error::{PartyError, Result};

// Re-export the core domain types
pub use action::{PartyAction, PartyPhase};
pub use host::{HostAdapter, MemoryHost};
pub use party::{FindReport, GroupReport, HealthReport, PartyModule, ToggleReport};
pub use roster::{RosterValidator, ValidatedRoster};
pub use scene::{GridPos, InvolvedTokens, SceneToken, TokenId};
pub use slots::{PartySlot, SlotDirectory, SlotId, SLOT_COUNT};
pub use spread::MAX_PARTY_SIZE;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
