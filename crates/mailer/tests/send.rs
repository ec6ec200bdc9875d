use httpmock::prelude::*;

use pairpost_mailer::message::to_raw;
use pairpost_mailer::{
    GmailTransport, MailError, OutgoingMessage, StoredCredentials, Transport,
};

fn creds() -> StoredCredentials {
    StoredCredentials::new("client-id".into(), "client-secret".into(), "1//refresh".into())
}

fn transport(server: &MockServer) -> GmailTransport {
    GmailTransport::with_endpoints(creds(), server.base_url(), server.url("/token"))
}

fn sample_message() -> OutgoingMessage {
    OutgoingMessage {
        from: "course@example.com".into(),
        to: "anna@example.com".into(),
        subject: "[Проекты C++] Финальный отзыв 2022".into(),
        body: "Привет!\nОценка: 9\n".into(),
    }
}

#[test]
fn send_refreshes_token_and_delivers() {
    let server = MockServer::start();
    let msg = sample_message();

    let token_mock = server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .json_body(serde_json::json!({ "access_token": "at-1", "expires_in": 3599 }));
    });
    let send_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/gmail/v1/users/me/messages/send")
            .header("authorization", "Bearer at-1")
            .json_body(serde_json::json!({ "raw": to_raw(&msg) }));
        then.status(200)
            .json_body(serde_json::json!({ "id": "msg-1", "threadId": "thread-1" }));
    });

    let receipt = transport(&server).send(&msg).unwrap();

    token_mock.assert();
    send_mock.assert();
    assert_eq!(receipt.message_id, "msg-1");
    assert_eq!(receipt.thread_id.as_deref(), Some("thread-1"));
}

#[test]
fn access_token_is_cached_across_sends() {
    let server = MockServer::start();

    let token_mock = server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .json_body(serde_json::json!({ "access_token": "at-1", "expires_in": 3599 }));
    });
    let send_mock = server.mock(|when, then| {
        when.method(POST).path("/gmail/v1/users/me/messages/send");
        then.status(200)
            .json_body(serde_json::json!({ "id": "msg-1", "threadId": null }));
    });

    let transport = transport(&server);
    transport.send(&sample_message()).unwrap();
    transport.send(&sample_message()).unwrap();

    assert_eq!(token_mock.hits(), 1, "second send should reuse the token");
    assert_eq!(send_mock.hits(), 2);
}

#[test]
fn revoked_refresh_token_is_a_validation_error() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(400)
            .json_body(serde_json::json!({ "error": "invalid_grant" }));
    });

    let err = transport(&server).send(&sample_message()).unwrap_err();
    match err {
        MailError::Validation(body) => assert!(body.contains("invalid_grant")),
        other => panic!("expected Validation, got {other}"),
    }
}

#[test]
fn upstream_rejection_maps_to_http_error() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .json_body(serde_json::json!({ "access_token": "at-1", "expires_in": 3599 }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/gmail/v1/users/me/messages/send");
        then.status(403).body("insufficient scopes");
    });

    let err = transport(&server).send(&sample_message()).unwrap_err();
    match err {
        MailError::Http(403, body) => assert!(body.contains("insufficient scopes")),
        other => panic!("expected Http(403), got {other}"),
    }
}

#[test]
fn verify_reports_granted_lifetime() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .json_body(serde_json::json!({ "access_token": "at-1", "expires_in": 3599 }));
    });

    assert_eq!(transport(&server).verify().unwrap(), 3599);
}
