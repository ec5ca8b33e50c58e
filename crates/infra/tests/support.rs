//! Shared fixtures for the PokitDok integration tests.

#![allow(dead_code)]

use pokitdok_infra::PokitDokClient;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "X";
pub const CLIENT_SECRET: &str = "Y";
pub const ACCESS_TOKEN: &str = "s8KYRJGTO0rWMy0zz1CCSCwsSesDyDlbNdZoRqVR";

/// Token endpoint that answers every client-credentials grant.
pub async fn mount_client_credentials(server: &MockServer, access_token: &str, expires_in: i64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_body(access_token, expires_in)),
        )
        .mount(server)
        .await;
}

pub fn token_body(access_token: &str, expires_in: i64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": expires_in,
        "scope": "user"
    })
}

/// Client connected to `server` with a one-hour token.
pub async fn connected_client(server: &MockServer) -> PokitDokClient {
    mount_client_credentials(server, ACCESS_TOKEN, 3600).await;
    PokitDokClient::connect(CLIENT_ID, CLIENT_SECRET, Some(&server.uri()))
        .await
        .expect("client should connect")
}

/// Minimal successful envelope.
pub fn envelope(data: Value) -> Value {
    json!({
        "meta": {
            "application_mode": "test",
            "activity_id": "5b1f0a4c0640fd0f2c0c0a4f",
            "processing_time": 12
        },
        "data": data
    })
}

/// Base address of a port nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
