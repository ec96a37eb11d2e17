//! Scene-side data types
//!
//! Tokens live in the host's scene documents; this crate only mirrors
//! the fields it reads (name, grid position, visibility) and hands
//! mutations back through the host adapter.
//!
//! ## Coordinate system
//!
//! Positions are grid cells, not pixels:
//! - X: columns, increasing to the right
//! - Y: rows, increasing downwards
//!
//! Conversion to the host's pixel space (cell * grid size) is the
//! host's business.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Grid-cell displacement from an anchor cell.
/// - .0 = dx (columns, positive = right)
/// - .1 = dy (rows, positive = down)
pub type GridOffset = (i32, i32);

/// Host-assigned token identifier. Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct TokenId(pub String);

impl TokenId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TokenId {
    fn from(value: &str) -> Self {
        TokenId(value.to_string())
    }
}

/// Position in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell reached by applying `offset` to this cell.
    pub fn offset_by(self, offset: GridOffset) -> Self {
        Self { x: self.x + offset.0, y: self.y + offset.1 }
    }

    /// Displacement from `self` to `other`.
    pub fn delta_to(self, other: GridPos) -> GridOffset {
        (other.x - self.x, other.y - self.y)
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Snapshot of a host-owned scene token.
///
/// The crate never creates or destroys tokens; it only matches them by
/// name and asks the host to move/hide/show them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SceneToken {
    pub id: TokenId,
    pub name: String,
    pub pos: GridPos,
    pub hidden: bool,
}

impl SceneToken {
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }
}

/// Per-operation binding of a validated roster to concrete scene
/// tokens. Built fresh on every toggle/find invocation and discarded
/// afterwards; the scene itself stays the single source of truth.
#[derive(Debug, Clone)]
pub struct InvolvedTokens {
    /// Member tokens in the host's stable scan order.
    pub members: Vec<SceneToken>,
    pub party: SceneToken,
}

impl InvolvedTokens {
    pub fn any_member_visible(&self) -> bool {
        self.members.iter().any(SceneToken::is_visible)
    }

    pub fn visible_member_ids(&self) -> Vec<TokenId> {
        self.members.iter().filter(|t| t.is_visible()).map(|t| t.id.clone()).collect()
    }

    pub fn member_ids(&self) -> Vec<TokenId> {
        self.members.iter().map(|t| t.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_by_and_delta_roundtrip() {
        let anchor = GridPos::new(10, -3);
        let moved = anchor.offset_by((2, -2));
        assert_eq!(moved, GridPos::new(12, -5));
        assert_eq!(anchor.delta_to(moved), (2, -2));
    }

    #[test]
    fn test_involved_tokens_visibility_helpers() {
        let token = |name: &str, hidden: bool| SceneToken {
            id: TokenId::from(name),
            name: name.to_string(),
            pos: GridPos::new(0, 0),
            hidden,
        };
        let involved = InvolvedTokens {
            members: vec![token("orc1", true), token("orc2", false)],
            party: token("boss", true),
        };
        assert!(involved.any_member_visible());
        assert_eq!(involved.visible_member_ids(), vec![TokenId::from("orc2")]);
        assert_eq!(involved.member_ids().len(), 2);
    }
}
