//! Chat output
//!
//! Builds the plain-text cards the module posts through the host's
//! chat surface: a one-time welcome card on startup (suppressed by the
//! `hideChatInfo` setting) and per-operation reports.

use fluent::FluentArgs;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::action::{PartyAction, PartyPhase};
use crate::error::PartyError;
use crate::localization::Localizer;
use crate::roster::ValidatedRoster;
use crate::settings::MODULE_TITLE;

/// Outbound chat message, handed to the host for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChatMessage {
    /// Speaker alias shown on the card.
    pub speaker: String,
    pub content: String,
    /// Whisper to the GM only instead of posting publicly.
    pub whisper_gm: bool,
}

impl ChatMessage {
    fn public(content: String) -> Self {
        Self { speaker: MODULE_TITLE.to_string(), content, whisper_gm: false }
    }

    fn gm(content: String) -> Self {
        Self { speaker: MODULE_TITLE.to_string(), content, whisper_gm: true }
    }
}

/// One-time welcome card, whispered to the GM.
pub fn welcome_card(localizer: &Localizer) -> ChatMessage {
    let title = localizer.format("chat-info-title", None);
    let body = localizer.format("chat-info-body", None);
    ChatMessage::gm(format!("{} v{}\n\n{}", title, crate::VERSION, body))
}

/// Report posted after a successful toggle.
pub fn toggle_report(
    localizer: &Localizer,
    action: PartyAction,
    roster: &ValidatedRoster,
) -> ChatMessage {
    let mut args = FluentArgs::new();
    args.set("party", roster.party_name().to_string());
    args.set("count", roster.member_count() as i64);
    let id = match action {
        PartyAction::Crunch => "report-crunched",
        PartyAction::Explode => "report-exploded",
    };
    ChatMessage::public(localizer.format(id, Some(&args)))
}

/// Report posted after a successful group.
pub fn group_report(localizer: &Localizer, roster: &ValidatedRoster) -> ChatMessage {
    let mut args = FluentArgs::new();
    args.set("party", roster.party_name().to_string());
    args.set("count", roster.member_count() as i64);
    ChatMessage::public(localizer.format("report-grouped", Some(&args)))
}

/// Report whispered after a find, naming what is currently on stage.
pub fn find_report(
    localizer: &Localizer,
    phase: PartyPhase,
    roster: &ValidatedRoster,
) -> ChatMessage {
    let mut args = FluentArgs::new();
    args.set("party", roster.party_name().to_string());
    args.set("count", roster.member_count() as i64);
    let id = match phase {
        PartyPhase::Crunched => "report-found-crunched",
        PartyPhase::Exploded => "report-found-exploded",
    };
    ChatMessage::gm(localizer.format(id, Some(&args)))
}

/// Error card, whispered to the GM.
pub fn error_report(localizer: &Localizer, err: &PartyError) -> ChatMessage {
    ChatMessage::gm(localizer.error_message(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterValidator;

    #[test]
    fn test_welcome_card_snapshot() {
        let card = welcome_card(&Localizer::new());
        assert!(card.whisper_gm);
        insta::assert_snapshot!(card.content, @r###"
        Party Crunch v0.1.0

        Crunch your party tokens into one, and explode them back onto the scene. Configure up to five parties in the module settings.
        "###);
    }

    #[test]
    fn test_toggle_report_is_public() {
        let roster = RosterValidator::validate("orc1, orc2, orc3", "boss").unwrap();
        let card = toggle_report(&Localizer::new(), PartyAction::Crunch, &roster);
        assert!(!card.whisper_gm);
        assert_eq!(card.speaker, "Party Crunch");
        insta::assert_snapshot!(card.content, @r###"Party "boss" has swallowed its 3 members."###);
    }

    #[test]
    fn test_find_report_names_the_visible_side() {
        let roster = RosterValidator::validate("orc1, orc2", "boss").unwrap();
        let localizer = Localizer::new();
        assert_eq!(
            find_report(&localizer, PartyPhase::Crunched, &roster).content,
            "Party token \"boss\" is on stage."
        );
        assert_eq!(
            find_report(&localizer, PartyPhase::Exploded, &roster).content,
            "2 members of party \"boss\" are on stage."
        );
    }

    #[test]
    fn test_error_report_is_whispered() {
        let card = error_report(&Localizer::new(), &PartyError::OperationBusy);
        assert!(card.whisper_gm);
        assert_eq!(card.content, "Another party operation is still running. Try again in a moment.");
    }
}
