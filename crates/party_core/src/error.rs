use thiserror::Error;

/// Stable error codes used in API error envelopes.
///
/// Kept as plain string constants so host-side macros can match on them
/// without tracking this crate's enum layout.
pub mod codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const UNSUPPORTED_SCHEMA_VERSION: &str = "UNSUPPORTED_SCHEMA_VERSION";
    pub const INVALID_SLOT: &str = "INVALID_SLOT";
    pub const INVALID_TOKEN_COUNT: &str = "INVALID_TOKEN_COUNT";
    pub const NAME_COLLISION: &str = "NAME_COLLISION";
    pub const TOO_MANY_MEMBERS: &str = "TOO_MANY_MEMBERS";
    pub const DUPLICATE_TOKEN_NAME: &str = "DUPLICATE_TOKEN_NAME";
    pub const TOKEN_NOT_FOUND: &str = "TOKEN_NOT_FOUND";
    pub const INVALID_VISIBILITY_STATE: &str = "INVALID_VISIBILITY_STATE";
    pub const OPERATION_BUSY: &str = "OPERATION_BUSY";
    pub const HOST_ERROR: &str = "HOST_ERROR";
    pub const LOCALIZATION_ERROR: &str = "LOCALIZATION_ERROR";
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PartyError {
    #[error("invalid token count: {members} member name(s), {parties} party name(s)")]
    InvalidTokenCount { members: usize, parties: usize },

    #[error("name appears in both member and party lists: {name}")]
    NameCollision { name: String },

    #[error("too many members: {count} (maximum is {max})")]
    TooManyMembers { count: usize, max: usize },

    #[error("scene contains more than one token named {name}")]
    DuplicateTokenName { name: String },

    #[error("no matching scene token found for: {}", .names.join(", "))]
    TokenNotFound { names: Vec<String> },

    #[error("party and member tokens are all hidden; cannot determine toggle direction")]
    InvalidVisibilityState,

    #[error("another party operation is still running")]
    OperationBusy,

    #[error("invalid party slot: {slot} (valid slots are 1..=5)")]
    InvalidSlot { slot: u8 },

    #[error("host error: {message}")]
    Host { message: String },

    #[error("localization error: {message}")]
    Localization { message: String },
}

impl PartyError {
    /// Stable string code for API envelopes and host-side dispatch.
    pub fn code(&self) -> &'static str {
        match self {
            PartyError::InvalidTokenCount { .. } => codes::INVALID_TOKEN_COUNT,
            PartyError::NameCollision { .. } => codes::NAME_COLLISION,
            PartyError::TooManyMembers { .. } => codes::TOO_MANY_MEMBERS,
            PartyError::DuplicateTokenName { .. } => codes::DUPLICATE_TOKEN_NAME,
            PartyError::TokenNotFound { .. } => codes::TOKEN_NOT_FOUND,
            PartyError::InvalidVisibilityState => codes::INVALID_VISIBILITY_STATE,
            PartyError::OperationBusy => codes::OPERATION_BUSY,
            PartyError::InvalidSlot { .. } => codes::INVALID_SLOT,
            PartyError::Host { .. } => codes::HOST_ERROR,
            PartyError::Localization { .. } => codes::LOCALIZATION_ERROR,
        }
    }

    /// Errors a GM can fix by editing names or scene tokens, as opposed
    /// to transient (busy) or host-side failures.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(
            self,
            PartyError::OperationBusy | PartyError::Host { .. } | PartyError::Localization { .. }
        )
    }

    pub fn host(message: impl Into<String>) -> Self {
        PartyError::Host { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, PartyError>;
