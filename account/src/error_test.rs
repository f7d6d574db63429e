use super::*;

#[test]
fn ok_envelope_serializes_under_ok_key() {
    let env = Envelope::from(Ok::<bool, ActionError>(true));
    assert_eq!(serde_json::to_value(&env).unwrap(), serde_json::json!({ "ok": true }));
}

#[test]
fn error_envelope_serializes_kind_and_message() {
    let env = Envelope::from(Err::<bool, _>(ActionError::auth("Invalid login credentials")));
    assert_eq!(
        serde_json::to_value(&env).unwrap(),
        serde_json::json!({ "error": "auth", "message": "Invalid login credentials" })
    );
}

#[test]
fn error_body_is_not_mistaken_for_empty_option() {
    let raw = r#"{"error":"data","message":"relation does not exist"}"#;
    let env: Envelope<Option<String>> = serde_json::from_str(raw).unwrap();
    let err = env.into_result().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Data);
    assert_eq!(err.message, "relation does not exist");
}

#[test]
fn null_ok_decodes_as_none() {
    let env: Envelope<Option<String>> = serde_json::from_str(r#"{"ok":null}"#).unwrap();
    assert_eq!(env.into_result().unwrap(), None);
}

#[test]
fn action_error_displays_message_only() {
    let err = ActionError::upload("bucket not found");
    assert_eq!(err.to_string(), "bucket not found");
    assert_eq!(err.kind.as_str(), "upload");
}

#[test]
fn error_kind_wire_names_match_as_str() {
    for kind in [ErrorKind::Validation, ErrorKind::Auth, ErrorKind::Data, ErrorKind::Upload, ErrorKind::Network] {
        let json = serde_json::to_value(kind).unwrap();
        assert_eq!(json, serde_json::Value::String(kind.as_str().to_owned()));
    }
}
