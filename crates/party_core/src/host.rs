//! Host adapter
//!
//! Everything durable lives on the host side: the settings store, the
//! scene documents, chat, notifications, the camera. This trait is the
//! module's entire window into the game client. Calls are synchronous
//! and issued one at a time by the orchestrator; they are not atomic
//! as a group, which is why the orchestrator serializes operations.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::error::{PartyError, Result};
use crate::localization::DEFAULT_LOCALE;
use crate::scene::{GridPos, SceneToken, TokenId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}

/// Toast notification recorded by the host UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notification {
    pub level: NotifyLevel,
    pub text: String,
}

/// The surface a game client exposes to this module.
pub trait HostAdapter {
    /// Read a module-scoped setting value.
    fn get_setting(&self, key: &str) -> Option<String>;

    /// Write a module-scoped setting value.
    fn set_setting(&mut self, key: &str, value: &str) -> Result<()>;

    /// Locale the host UI runs in.
    fn requested_locale(&self) -> String {
        DEFAULT_LOCALE.to_string()
    }

    /// GM-owned tokens of the active scene, in the host's stable scan
    /// order.
    fn owned_tokens(&self) -> Vec<SceneToken>;

    /// Tokens currently selected by the GM.
    fn selected_tokens(&self) -> Vec<SceneToken>;

    fn update_position(&mut self, id: &TokenId, pos: GridPos) -> Result<()>;

    fn update_hidden(&mut self, id: &TokenId, hidden: bool) -> Result<()>;

    /// Replace the GM's selection.
    fn select_tokens(&mut self, ids: &[TokenId]) -> Result<()>;

    /// Pan the view to a grid cell.
    fn pan_to(&mut self, pos: GridPos) -> Result<()>;

    fn post_chat(&mut self, message: &ChatMessage) -> Result<()>;

    fn notify(&mut self, level: NotifyLevel, text: &str);
}

/// In-memory reference host, used by the test suite and the CLI
/// harness. Serializable so a whole host state can be loaded from and
/// dumped back to JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryHost {
    #[serde(default)]
    pub tokens: Vec<SceneToken>,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    #[serde(default)]
    pub selection: Vec<TokenId>,
    #[serde(default)]
    pub camera: Option<GridPos>,
    #[serde(default)]
    pub chat_log: Vec<ChatMessage>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Remaining scene mutations before the host starts rejecting
    /// them. Test-only failure injection; `None` means unlimited.
    #[serde(skip)]
    pub mutation_budget: Option<usize>,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            settings: BTreeMap::new(),
            selection: Vec::new(),
            camera: None,
            chat_log: Vec::new(),
            notifications: Vec::new(),
            locale: default_locale(),
            mutation_budget: None,
        }
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token; the id is derived from the name and insertion
    /// index so test scenes stay readable.
    pub fn add_token(&mut self, name: &str, x: i32, y: i32, hidden: bool) -> TokenId {
        let id = TokenId(format!("t{}-{}", self.tokens.len(), name.to_lowercase()));
        self.tokens.push(SceneToken {
            id: id.clone(),
            name: name.to_string(),
            pos: GridPos::new(x, y),
            hidden,
        });
        id
    }

    pub fn token_by_name(&self, name: &str) -> Option<&SceneToken> {
        let needle = name.to_lowercase();
        self.tokens.iter().find(|t| t.name.to_lowercase() == needle)
    }

    fn token_mut(&mut self, id: &TokenId) -> Result<&mut SceneToken> {
        self.tokens
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| PartyError::host(format!("unknown token id: {}", id)))
    }

    fn spend_mutation(&mut self) -> Result<()> {
        match self.mutation_budget {
            Some(0) => Err(PartyError::host("scene update rejected")),
            Some(ref mut budget) => {
                *budget -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl HostAdapter for MemoryHost {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.settings.get(key).cloned()
    }

    fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        self.settings.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn requested_locale(&self) -> String {
        self.locale.clone()
    }

    fn owned_tokens(&self) -> Vec<SceneToken> {
        self.tokens.clone()
    }

    fn selected_tokens(&self) -> Vec<SceneToken> {
        self.selection
            .iter()
            .filter_map(|id| self.tokens.iter().find(|t| t.id == *id))
            .cloned()
            .collect()
    }

    fn update_position(&mut self, id: &TokenId, pos: GridPos) -> Result<()> {
        self.spend_mutation()?;
        self.token_mut(id)?.pos = pos;
        Ok(())
    }

    fn update_hidden(&mut self, id: &TokenId, hidden: bool) -> Result<()> {
        self.spend_mutation()?;
        self.token_mut(id)?.hidden = hidden;
        Ok(())
    }

    fn select_tokens(&mut self, ids: &[TokenId]) -> Result<()> {
        self.selection = ids.to_vec();
        Ok(())
    }

    fn pan_to(&mut self, pos: GridPos) -> Result<()> {
        self.camera = Some(pos);
        Ok(())
    }

    fn post_chat(&mut self, message: &ChatMessage) -> Result<()> {
        self.chat_log.push(message.clone());
        Ok(())
    }

    fn notify(&mut self, level: NotifyLevel, text: &str) {
        self.notifications.push(Notification { level, text: text.to_string() });
    }
}
