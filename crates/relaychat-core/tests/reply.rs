use relaychat_core::error::ReplyError;
use relaychat_core::models::reply::ChatReply;
use serde_json::json;

#[test]
fn flat_reply_is_read_directly() {
    let body = json!({
        "response": "Hello there",
        "session_id": "abc",
        "token_estimate": 12,
        "timestamp": "2025-01-01T00:00:00Z"
    });

    let reply = ChatReply::from_value(&body).unwrap();
    assert_eq!(reply.response, "Hello there");
    assert_eq!(reply.session_id.as_deref(), Some("abc"));
    assert_eq!(reply.token_estimate, Some(12));
    assert_eq!(reply.timestamp.as_deref(), Some("2025-01-01T00:00:00Z"));
}

#[test]
fn nested_data_wins_over_top_level() {
    let body = json!({
        "success": true,
        "response": "outer",
        "data": { "response": "inner", "session_id": "s-1", "usage": {} }
    });

    let reply = ChatReply::from_value(&body).unwrap();
    assert_eq!(reply.response, "inner");
    assert_eq!(reply.session_id.as_deref(), Some("s-1"));
}

#[test]
fn session_id_falls_back_to_top_level() {
    let body = json!({
        "success": true,
        "session_id": "top",
        "data": { "response": "hi" }
    });

    let reply = ChatReply::from_value(&body).unwrap();
    assert_eq!(reply.session_id.as_deref(), Some("top"));
}

#[test]
fn missing_response_becomes_empty_text() {
    let reply = ChatReply::from_value(&json!({ "data": {} })).unwrap();
    assert_eq!(reply.response, "");
    assert_eq!(reply.session_id, None);
}

#[test]
fn empty_session_id_counts_as_absent() {
    let reply = ChatReply::from_value(&json!({ "response": "x", "session_id": "" })).unwrap();
    assert_eq!(reply.session_id, None);
}

#[test]
fn null_data_is_ignored() {
    let reply = ChatReply::from_value(&json!({ "data": null, "response": "flat" })).unwrap();
    assert_eq!(reply.response, "flat");
}

#[test]
fn error_string_is_surfaced() {
    let err = ChatReply::from_value(&json!({ "error": "Subfeed API Error: 503" })).unwrap_err();
    assert_eq!(err, ReplyError::Service("Subfeed API Error: 503".to_string()));
    assert_eq!(err.to_string(), "Subfeed API Error: 503");
}

#[test]
fn empty_error_string_is_not_an_error() {
    let reply = ChatReply::from_value(&json!({ "error": "", "data": { "response": "ok" } })).unwrap();
    assert_eq!(reply.response, "ok");
}

#[test]
fn null_body_is_empty_reply_error() {
    let err = ChatReply::from_value(&serde_json::Value::Null).unwrap_err();
    assert_eq!(err, ReplyError::Empty);
}

#[test]
fn fractional_token_estimate_is_truncated() {
    let reply = ChatReply::from_value(&json!({ "response": "x", "token_estimate": 7.9 })).unwrap();
    assert_eq!(reply.token_estimate, Some(7));
}
