//! Macro-facing API
//!
//! JSON-string in, JSON-string out, so host-side macros can call the
//! module without sharing Rust types. Requests carry a
//! `schema_version`; responses are versioned envelopes.

pub mod macro_json;

pub use macro_json::{
    find_party_json, group_party_json, health_check_json, toggle_party_json, GroupRequest,
    PartyRequest,
};
