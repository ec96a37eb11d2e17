//! Roster parsing and validation
//!
//! Turns the two raw, GM-entered name strings (comma-separated members,
//! single party name) into a canonical roster, or fails with a
//! classified error. Pure functions; callers persist the canonical
//! strings back to the host settings store afterwards.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PartyError, Result};
use crate::spread::MAX_PARTY_SIZE;

/// Canonical, validated party roster.
///
/// Member names are lower-cased, deduplicated, and kept in first-seen
/// order so settings round-trip in a stable display order. The party
/// name is lower-cased and disjoint from the member set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidatedRoster {
    member_names: Vec<String>,
    party_name: String,
}

impl ValidatedRoster {
    pub fn member_names(&self) -> &[String] {
        &self.member_names
    }

    pub fn party_name(&self) -> &str {
        &self.party_name
    }

    pub fn member_count(&self) -> usize {
        self.member_names.len()
    }

    /// Case-insensitive membership test.
    pub fn contains_member(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.member_names.iter().any(|m| *m == needle)
    }

    /// Canonical comma-separated member list, suitable for writing back
    /// to the settings store. Re-validating this string together with
    /// `party_name` reproduces the same roster.
    pub fn member_csv(&self) -> String {
        self.member_names.join(", ")
    }
}

/// Roster validation utility.
pub struct RosterValidator;

impl RosterValidator {
    /// Split a raw comma-separated string into cleaned name tokens:
    /// trimmed, lower-cased, empties dropped. Duplicates are kept so
    /// callers can decide how to treat them.
    pub fn parse_names(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|part| part.trim().to_lowercase())
            .filter(|part| !part.is_empty())
            .collect()
    }

    /// Validate raw member and party name strings into a roster.
    pub fn validate(members_raw: &str, party_raw: &str) -> Result<ValidatedRoster> {
        let member_tokens = Self::parse_names(members_raw);
        let party_tokens = Self::parse_names(party_raw);

        if member_tokens.is_empty() || party_tokens.len() != 1 {
            return Err(PartyError::InvalidTokenCount {
                members: member_tokens.len(),
                parties: party_tokens.len(),
            });
        }
        let party_name = party_tokens.into_iter().next().unwrap();

        if let Some(collision) = member_tokens.iter().find(|name| **name == party_name) {
            return Err(PartyError::NameCollision { name: collision.clone() });
        }

        // Dedupe, preserving first-seen order. Member lists are tiny
        // (hard cap 25), so a linear scan beats a set here.
        let mut member_names: Vec<String> = Vec::with_capacity(member_tokens.len());
        for name in member_tokens {
            if !member_names.contains(&name) {
                member_names.push(name);
            }
        }

        if member_names.len() > MAX_PARTY_SIZE {
            return Err(PartyError::TooManyMembers {
                count: member_names.len(),
                max: MAX_PARTY_SIZE,
            });
        }

        Ok(ValidatedRoster { member_names, party_name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_names_cleans_input() {
        assert_eq!(
            RosterValidator::parse_names("  Orc1 , orc2 ,, ORC3  "),
            vec!["orc1", "orc2", "orc3"]
        );
        assert!(RosterValidator::parse_names(" , ,").is_empty());
    }

    #[test]
    fn test_validate_folds_case_and_dedupes() {
        let roster = RosterValidator::validate("orc1, orc2, Orc1", "boss").unwrap();
        assert_eq!(roster.member_names(), ["orc1", "orc2"]);
        assert_eq!(roster.party_name(), "boss");
        assert_eq!(roster.member_csv(), "orc1, orc2");
    }

    #[test]
    fn test_validate_rejects_collision() {
        let err = RosterValidator::validate("orc1, boss", "boss").unwrap_err();
        assert_eq!(err, PartyError::NameCollision { name: "boss".into() });
    }

    #[test]
    fn test_validate_rejects_bad_counts() {
        assert!(matches!(
            RosterValidator::validate("", "boss"),
            Err(PartyError::InvalidTokenCount { members: 0, parties: 1 })
        ));
        assert!(matches!(
            RosterValidator::validate("orc1", ""),
            Err(PartyError::InvalidTokenCount { members: 1, parties: 0 })
        ));
        assert!(matches!(
            RosterValidator::validate("orc1", "boss, other"),
            Err(PartyError::InvalidTokenCount { members: 1, parties: 2 })
        ));
    }

    #[test]
    fn test_member_count_bounds() {
        let one = "orc1";
        assert!(RosterValidator::validate(one, "boss").is_ok());

        let names: Vec<String> = (1..=25).map(|i| format!("orc{}", i)).collect();
        let at_cap = names.join(",");
        assert_eq!(RosterValidator::validate(&at_cap, "boss").unwrap().member_count(), 25);

        let over = format!("{},orc26", at_cap);
        assert_eq!(
            RosterValidator::validate(&over, "boss").unwrap_err(),
            PartyError::TooManyMembers { count: 26, max: 25 }
        );
    }

    #[test]
    fn test_duplicates_do_not_count_toward_cap() {
        let names: Vec<String> = (1..=25).map(|i| format!("orc{}", i)).collect();
        let with_repeats = format!("{0},{0}", names.join(","));
        assert!(RosterValidator::validate(&with_repeats, "boss").is_ok());
    }

    #[test]
    fn test_contains_member_is_case_insensitive() {
        let roster = RosterValidator::validate("orc1, orc2", "boss").unwrap();
        assert!(roster.contains_member(" ORC1 "));
        assert!(!roster.contains_member("boss"));
    }

    proptest! {
        /// Re-validating the canonical output of a valid roster yields
        /// the same roster.
        #[test]
        fn prop_validation_is_idempotent(
            members in prop::collection::vec("[A-Za-z0-9 ]{0,10}", 0..40),
            party in "[A-Za-z0-9]{0,10}",
        ) {
            let members_raw = members.join(",");
            if let Ok(roster) = RosterValidator::validate(&members_raw, &party) {
                let again = RosterValidator::validate(&roster.member_csv(), roster.party_name())
                    .expect("canonical form must validate");
                prop_assert_eq!(roster, again);
            }
        }

        /// Successful validation always yields a party name disjoint
        /// from the member set, and a member count within 1..=25.
        #[test]
        fn prop_valid_rosters_are_disjoint_and_bounded(
            members in prop::collection::vec("[A-Za-z0-9 ]{0,10}", 0..40),
            party in "[A-Za-z0-9]{0,10}",
        ) {
            let members_raw = members.join(",");
            if let Ok(roster) = RosterValidator::validate(&members_raw, &party) {
                prop_assert!(!roster.contains_member(roster.party_name()));
                prop_assert!((1..=MAX_PARTY_SIZE).contains(&roster.member_count()));
            }
        }
    }
}
