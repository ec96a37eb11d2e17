//! User-facing text localization
//!
//! Fluent (FTL) based. The module ships English and German resources
//! embedded in the binary; hosts can layer additional locales on top
//! with [`Localizer::load_locale`]. Missing messages fall back to the
//! fallback locale, then to the raw message id, so a half-translated
//! locale never breaks an operation.

use std::collections::HashMap;

use fluent::{FluentArgs, FluentBundle, FluentResource};
use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use once_cell::sync::Lazy;
use unic_langid::LanguageIdentifier;

use crate::error::{PartyError, Result};

/// Locales shipped with the module.
pub const SUPPORTED_LOCALES: &[&str] = &["en-US", "de-DE"];

pub const DEFAULT_LOCALE: &str = "en-US";

const FTL_EN_US: &str = include_str!("locales/en-US.ftl");
const FTL_DE_DE: &str = include_str!("locales/de-DE.ftl");

static SUPPORTED_LANGIDS: Lazy<Vec<LanguageIdentifier>> = Lazy::new(|| {
    SUPPORTED_LOCALES.iter().map(|l| l.parse().expect("static locale list is valid")).collect()
});

pub struct Localizer {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    current_locale: String,
    fallback_locale: String,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Localizer {
    /// Localizer with the embedded resources, current locale `en-US`.
    pub fn new() -> Self {
        let mut localizer = Self {
            bundles: HashMap::new(),
            current_locale: DEFAULT_LOCALE.to_string(),
            fallback_locale: DEFAULT_LOCALE.to_string(),
        };
        // Embedded resources are compile-time assets; failing to parse
        // them is a build defect, not a runtime condition.
        localizer.load_locale("en-US", FTL_EN_US).expect("embedded en-US resource is valid");
        localizer.load_locale("de-DE", FTL_DE_DE).expect("embedded de-DE resource is valid");
        localizer
    }

    /// Localizer negotiated against a host-requested locale.
    pub fn for_locale(requested: &str) -> Self {
        let mut localizer = Self::new();
        localizer.set_locale(requested);
        localizer
    }

    /// Add or replace a locale's resources.
    pub fn load_locale(&mut self, locale: &str, ftl_content: &str) -> Result<()> {
        let resource = FluentResource::try_new(ftl_content.to_string()).map_err(|_| {
            PartyError::Localization { message: format!("failed to parse FTL for {}", locale) }
        })?;

        let lang_id: LanguageIdentifier = locale.parse().map_err(|_| {
            PartyError::Localization { message: format!("invalid locale: {}", locale) }
        })?;

        let mut bundle = FluentBundle::new(vec![lang_id]);
        // No Unicode isolation marks; chat output is plain text.
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|_| PartyError::Localization {
            message: format!("conflicting message ids in {}", locale),
        })?;

        self.bundles.insert(locale.to_string(), bundle);
        Ok(())
    }

    /// Switch the current locale, negotiating against the loaded ones.
    /// `de` resolves to `de-DE`; anything unknown lands on the fallback.
    pub fn set_locale(&mut self, requested: &str) {
        let requested_ids: Vec<LanguageIdentifier> =
            requested.parse().map(|id| vec![id]).unwrap_or_default();
        let fallback: LanguageIdentifier =
            self.fallback_locale.parse().expect("fallback locale is valid");

        let negotiated = negotiate_languages(
            &requested_ids,
            SUPPORTED_LANGIDS.as_slice(),
            Some(&fallback),
            NegotiationStrategy::Filtering,
        );
        if let Some(locale) = negotiated.first() {
            self.current_locale = locale.to_string();
        }
    }

    pub fn current_locale(&self) -> &str {
        &self.current_locale
    }

    /// Format a message in the current locale, falling back to the
    /// fallback locale and finally to the message id itself.
    pub fn format(&self, id: &str, args: Option<&FluentArgs>) -> String {
        for locale in [&self.current_locale, &self.fallback_locale] {
            if let Some(bundle) = self.bundles.get(locale) {
                if let Some(message) = bundle.get_message(id) {
                    if let Some(pattern) = message.value() {
                        let mut errors = Vec::new();
                        let text = bundle.format_pattern(pattern, args, &mut errors);
                        if !errors.is_empty() {
                            log::warn!("formatting errors for message {}: {:?}", id, errors);
                        }
                        return text.into_owned();
                    }
                }
            }
        }
        log::warn!("missing localization message: {}", id);
        id.to_string()
    }

    /// User-facing message for an operation error.
    pub fn error_message(&self, err: &PartyError) -> String {
        let mut args = FluentArgs::new();
        let id = match err {
            PartyError::InvalidTokenCount { .. } => "error-invalid-token-count",
            PartyError::NameCollision { name } => {
                args.set("name", name.clone());
                "error-name-collision"
            }
            PartyError::TooManyMembers { count, max } => {
                args.set("count", *count as i64);
                args.set("max", *max as i64);
                "error-too-many-members"
            }
            PartyError::DuplicateTokenName { name } => {
                args.set("name", name.clone());
                "error-duplicate-token-name"
            }
            PartyError::TokenNotFound { names } => {
                args.set("names", names.join(", "));
                "error-token-not-found"
            }
            PartyError::InvalidVisibilityState => "error-invalid-visibility-state",
            PartyError::OperationBusy => "error-operation-busy",
            PartyError::InvalidSlot { slot } => {
                args.set("slot", *slot as i64);
                "error-invalid-slot"
            }
            PartyError::Host { message } | PartyError::Localization { message } => {
                args.set("message", message.clone());
                "error-host"
            }
        };
        self.format(id, Some(&args))
    }
}
