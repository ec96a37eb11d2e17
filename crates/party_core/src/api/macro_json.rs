use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{codes, PartyError};
use crate::host::HostAdapter;
use crate::party::PartyModule;
use crate::slots::SlotId;

/// Request for toggle and find.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PartyRequest {
    pub schema_version: u8,
    /// Party slot number, 1..=5.
    pub party_no: u8,
}

/// Request for group: the party name stands in for the original's
/// modal prompt.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GroupRequest {
    pub schema_version: u8,
    pub party_no: u8,
    pub party_name: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct OkEnvelope<T: Serialize + JsonSchema> {
    schema_version: u8,
    ok: bool,
    result: T,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ErrEnvelope {
    schema_version: u8,
    ok: bool,
    code: String,
    message: String,
}

fn ok_envelope<T: Serialize + JsonSchema>(result: T) -> Result<String, String> {
    let envelope = OkEnvelope { schema_version: crate::SCHEMA_VERSION, ok: true, result };
    serde_json::to_string(&envelope).map_err(|e| error_envelope(codes::HOST_ERROR, &e.to_string()))
}

fn error_envelope(code: &str, message: &str) -> String {
    let envelope = ErrEnvelope {
        schema_version: crate::SCHEMA_VERSION,
        ok: false,
        code: code.to_string(),
        message: message.to_string(),
    };
    serde_json::to_string(&envelope)
        .unwrap_or_else(|_| format!("{}: {}", code, message))
}

fn party_error_envelope(err: &PartyError) -> String {
    error_envelope(err.code(), &err.to_string())
}

fn parse_request<'a, T: Deserialize<'a>>(request: &'a str) -> Result<T, String> {
    serde_json::from_str(request)
        .map_err(|e| error_envelope(codes::INVALID_REQUEST, &e.to_string()))
}

fn check_schema_version(version: u8) -> Result<(), String> {
    if version == crate::SCHEMA_VERSION {
        Ok(())
    } else {
        Err(error_envelope(
            codes::UNSUPPORTED_SCHEMA_VERSION,
            &format!("expected schema_version {}, got {}", crate::SCHEMA_VERSION, version),
        ))
    }
}

fn parse_slot(party_no: u8) -> Result<SlotId, String> {
    SlotId::new(party_no).map_err(|err| party_error_envelope(&err))
}

/// Toggle a party slot between crunched and exploded.
pub fn toggle_party_json<H: HostAdapter>(
    module: &mut PartyModule<H>,
    request: &str,
) -> Result<String, String> {
    let req: PartyRequest = parse_request(request)?;
    check_schema_version(req.schema_version)?;
    let slot = parse_slot(req.party_no)?;

    info!(party_no = req.party_no, "api toggle");
    match module.toggle(slot) {
        Ok(report) => ok_envelope(report),
        Err(err) => {
            warn!(party_no = req.party_no, code = err.code(), "api toggle failed");
            Err(party_error_envelope(&err))
        }
    }
}

/// Group the GM's current selection into a party slot.
pub fn group_party_json<H: HostAdapter>(
    module: &mut PartyModule<H>,
    request: &str,
) -> Result<String, String> {
    let req: GroupRequest = parse_request(request)?;
    check_schema_version(req.schema_version)?;
    let slot = parse_slot(req.party_no)?;

    info!(party_no = req.party_no, "api group");
    match module.group(slot, &req.party_name) {
        Ok(report) => ok_envelope(report),
        Err(err) => {
            warn!(party_no = req.party_no, code = err.code(), "api group failed");
            Err(party_error_envelope(&err))
        }
    }
}

/// Select and focus a party slot's visible side.
pub fn find_party_json<H: HostAdapter>(
    module: &mut PartyModule<H>,
    request: &str,
) -> Result<String, String> {
    let req: PartyRequest = parse_request(request)?;
    check_schema_version(req.schema_version)?;
    let slot = parse_slot(req.party_no)?;

    info!(party_no = req.party_no, "api find");
    match module.find(slot) {
        Ok(report) => ok_envelope(report),
        Err(err) => {
            warn!(party_no = req.party_no, code = err.code(), "api find failed");
            Err(party_error_envelope(&err))
        }
    }
}

/// Module and per-slot status report. Never fails on slot problems;
/// those are reported inside the result.
pub fn health_check_json<H: HostAdapter>(module: &PartyModule<H>) -> Result<String, String> {
    ok_envelope(module.health_check())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use serde_json::{json, Value};

    fn module() -> PartyModule<MemoryHost> {
        let mut host = MemoryHost::new();
        host.add_token("Boss", 10, 10, false);
        host.add_token("Orc1", 2, 2, true);
        host.add_token("Orc2", 3, 2, true);
        host.set_setting("memberTokenNames1", "orc1, orc2").unwrap();
        host.set_setting("partyTokenName1", "boss").unwrap();
        PartyModule::new(host)
    }

    #[test]
    fn test_toggle_roundtrip() {
        let mut module = module();
        let request = json!({ "schema_version": 1, "party_no": 1 }).to_string();
        let response = toggle_party_json(&mut module, &request).unwrap();

        let parsed: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["schema_version"], 1);
        assert_eq!(parsed["ok"], true);
        assert_eq!(parsed["result"]["action"], "explode");
        assert_eq!(parsed["result"]["party_name"], "boss");
        assert_eq!(parsed["result"]["member_count"], 2);
    }

    #[test]
    fn test_unsupported_schema_version() {
        let mut module = module();
        let request = json!({ "schema_version": 9, "party_no": 1 }).to_string();
        let err = toggle_party_json(&mut module, &request).unwrap_err();

        let parsed: Value = serde_json::from_str(&err).unwrap();
        assert_eq!(parsed["ok"], false);
        assert_eq!(parsed["code"], codes::UNSUPPORTED_SCHEMA_VERSION);
    }

    #[test]
    fn test_out_of_range_slot() {
        let mut module = module();
        let request = json!({ "schema_version": 1, "party_no": 6 }).to_string();
        let err = find_party_json(&mut module, &request).unwrap_err();

        let parsed: Value = serde_json::from_str(&err).unwrap();
        assert_eq!(parsed["code"], codes::INVALID_SLOT);
    }

    #[test]
    fn test_malformed_request() {
        let mut module = module();
        let err = toggle_party_json(&mut module, "{not json").unwrap_err();
        let parsed: Value = serde_json::from_str(&err).unwrap();
        assert_eq!(parsed["code"], codes::INVALID_REQUEST);
    }

    #[test]
    fn test_operation_error_is_enveloped() {
        let mut module = module();
        // slot 2 is not configured
        let request = json!({ "schema_version": 1, "party_no": 2 }).to_string();
        let err = toggle_party_json(&mut module, &request).unwrap_err();

        let parsed: Value = serde_json::from_str(&err).unwrap();
        assert_eq!(parsed["code"], codes::INVALID_TOKEN_COUNT);
        assert!(parsed["message"].as_str().unwrap().contains("token count"));
    }

    #[test]
    fn test_group_from_selection() {
        let mut host = MemoryHost::new();
        let a = host.add_token("Orc1", 0, 0, false);
        let b = host.add_token("Orc2", 1, 0, false);
        host.add_token("Boss", 5, 5, true);
        host.select_tokens(&[a, b]).unwrap();

        let mut module = PartyModule::new(host);
        let request =
            json!({ "schema_version": 1, "party_no": 2, "party_name": "Boss" }).to_string();
        let response = group_party_json(&mut module, &request).unwrap();

        let parsed: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["ok"], true);
        assert_eq!(parsed["result"]["party_name"], "boss");
        assert_eq!(parsed["result"]["member_names"], json!(["orc1", "orc2"]));
        assert_eq!(
            module.host().get_setting("memberTokenNames2"),
            Some("orc1, orc2".to_string())
        );
    }

    #[test]
    fn test_health_check_envelope() {
        let module = module();
        let health = health_check_json(&module).unwrap();

        let parsed: Value = serde_json::from_str(&health).unwrap();
        assert_eq!(parsed["ok"], true);
        assert_eq!(parsed["result"]["slots"].as_array().unwrap().len(), 5);
        assert_eq!(parsed["result"]["slots"][0]["status"], "ready");
        assert_eq!(parsed["result"]["slots"][2]["status"], "not_configured");
    }
}
