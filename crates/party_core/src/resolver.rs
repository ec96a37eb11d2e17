//! Token resolution
//!
//! Binds a validated roster to concrete tokens in the active scene.
//! Every roster name must match exactly one GM-owned token; ambiguity
//! and misses are classified, never guessed around.

use std::collections::HashMap;

use crate::error::{PartyError, Result};
use crate::roster::ValidatedRoster;
use crate::scene::{InvolvedTokens, SceneToken};

pub struct TokenResolver;

impl TokenResolver {
    /// Resolve a roster against the GM-owned tokens of the active
    /// scene, given in the host's stable scan order.
    ///
    /// Member tokens come back in scan order. A roster name matched by
    /// two or more scene tokens fails with `DuplicateTokenName` (the
    /// name is upper-cased for display, matching the module's chat
    /// output); names with no match at all are collected into one
    /// `TokenNotFound` listing every miss.
    pub fn resolve(roster: &ValidatedRoster, owned: &[SceneToken]) -> Result<InvolvedTokens> {
        let mut members: Vec<SceneToken> = Vec::with_capacity(roster.member_count());
        let mut seen: HashMap<String, ()> = HashMap::new();
        let mut party: Option<SceneToken> = None;

        for token in owned {
            let name = token.name.trim().to_lowercase();
            let is_member = roster.contains_member(&name);
            let is_party = name == roster.party_name();
            if !is_member && !is_party {
                continue;
            }
            if seen.insert(name.clone(), ()).is_some() {
                return Err(PartyError::DuplicateTokenName { name: name.to_uppercase() });
            }
            if is_party {
                party = Some(token.clone());
            } else {
                members.push(token.clone());
            }
        }

        let mut missing: Vec<String> = roster
            .member_names()
            .iter()
            .filter(|name| !seen.contains_key(*name))
            .cloned()
            .collect();
        if party.is_none() {
            missing.push(roster.party_name().to_string());
        }
        match party {
            Some(party) if missing.is_empty() => Ok(InvolvedTokens { members, party }),
            _ => Err(PartyError::TokenNotFound { names: missing }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterValidator;
    use crate::scene::{GridPos, TokenId};

    fn token(id: &str, name: &str) -> SceneToken {
        SceneToken {
            id: TokenId::from(id),
            name: name.to_string(),
            pos: GridPos::new(0, 0),
            hidden: false,
        }
    }

    #[test]
    fn test_resolves_in_scan_order() {
        let roster = RosterValidator::validate("orc2, orc1", "boss").unwrap();
        let owned = vec![token("a", "Orc1"), token("b", "boss"), token("c", "ORC2")];
        let involved = TokenResolver::resolve(&roster, &owned).unwrap();

        // scene scan order, not roster order
        let names: Vec<&str> = involved.members.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Orc1", "ORC2"]);
        assert_eq!(involved.party.id, TokenId::from("b"));
    }

    #[test]
    fn test_unrelated_tokens_are_ignored() {
        let roster = RosterValidator::validate("orc1", "boss").unwrap();
        let owned = vec![
            token("a", "bystander"),
            token("b", "orc1"),
            token("c", "bystander"), // duplicate name, but not in the roster
            token("d", "boss"),
        ];
        assert!(TokenResolver::resolve(&roster, &owned).is_ok());
    }

    #[test]
    fn test_duplicate_roster_name_in_scene() {
        let roster = RosterValidator::validate("orc1, orc2", "boss").unwrap();
        let owned =
            vec![token("a", "orc1"), token("b", "Orc1"), token("c", "orc2"), token("d", "boss")];
        assert_eq!(
            TokenResolver::resolve(&roster, &owned).unwrap_err(),
            PartyError::DuplicateTokenName { name: "ORC1".into() }
        );
    }

    #[test]
    fn test_duplicate_party_token() {
        let roster = RosterValidator::validate("orc1", "boss").unwrap();
        let owned = vec![token("a", "orc1"), token("b", "boss"), token("c", "BOSS")];
        assert_eq!(
            TokenResolver::resolve(&roster, &owned).unwrap_err(),
            PartyError::DuplicateTokenName { name: "BOSS".into() }
        );
    }

    #[test]
    fn test_missing_names_are_all_listed() {
        let roster = RosterValidator::validate("orc1, orc2, orc3", "boss").unwrap();
        let owned = vec![token("a", "orc2")];
        assert_eq!(
            TokenResolver::resolve(&roster, &owned).unwrap_err(),
            PartyError::TokenNotFound {
                names: vec!["orc1".into(), "orc3".into(), "boss".into()]
            }
        );
    }
}
