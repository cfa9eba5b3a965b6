use relaychat_client::{ChatTransport, HttpTransport, TransportError};
use relaychat_core::error::ReplyError;
use relaychat_core::models::request::ChatRequest;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn transport(server: &MockServer) -> HttpTransport {
    HttpTransport::new(format!("{}/functions/v1/chat", server.uri())).unwrap()
}

#[tokio::test]
async fn posts_message_with_null_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/functions/v1/chat"))
        .and(body_json(json!({ "message": "hello", "session_id": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "hi",
            "session_id": "abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = transport(&server)
        .await
        .send(&ChatRequest::new("hello", None))
        .await
        .unwrap();

    assert_eq!(reply.response, "hi");
    assert_eq!(reply.session_id.as_deref(), Some("abc"));
}

#[tokio::test]
async fn reads_nested_reply_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "response": "nested", "session_id": "s-9", "usage": { "tokens": 4 } },
            "error": null
        })))
        .mount(&server)
        .await;

    let reply = transport(&server)
        .await
        .send(&ChatRequest::new("hello", Some("s-8".into())))
        .await
        .unwrap();

    assert_eq!(reply.response, "nested");
    assert_eq!(reply.session_id.as_deref(), Some("s-9"));
}

#[tokio::test]
async fn api_key_is_sent_as_bearer_and_apikey() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer anon-key"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server).await.with_api_key("anon-key");
    transport.send(&ChatRequest::new("hello", None)).await.unwrap();
}

#[tokio::test]
async fn error_envelope_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(502).set_body_json(json!({ "error": "Subfeed API Error: 503" })),
        )
        .mount(&server)
        .await;

    let err = transport(&server)
        .await
        .send(&ChatRequest::new("hello", None))
        .await
        .unwrap_err();

    match err {
        TransportError::Status { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Subfeed API Error: 503");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(504).set_body_string("gateway timeout"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .await
        .send(&ChatRequest::new("hello", None))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "HTTP 504");
}

#[tokio::test]
async fn empty_success_body_is_an_empty_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = transport(&server)
        .await
        .send(&ChatRequest::new("hello", None))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Reply(ReplyError::Empty)));
}

#[tokio::test]
async fn error_field_on_success_status_is_still_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "quota exceeded" })))
        .mount(&server)
        .await;

    let err = transport(&server)
        .await
        .send(&ChatRequest::new("hello", None))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "quota exceeded");
}

#[tokio::test]
async fn clear_posts_clear_action() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "action": "clear" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "Session cleared" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    transport(&server).await.clear().await.unwrap();
}

#[tokio::test]
async fn debug_output_hides_api_key() {
    let transport = HttpTransport::new("http://localhost:1/chat")
        .unwrap()
        .with_api_key("super-secret");
    let debug = format!("{transport:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("[REDACTED]"));
}
