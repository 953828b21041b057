use tagstream_client::{ConnectionConfig, Credentials, TagStreamClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client pointed at the mock server with an established session.
pub async fn connected_client(server: &MockServer) -> TagStreamClient {
    Mock::given(method("POST"))
        .and(path("/v2/sessions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "data": { "type": "sessions", "attributes": { "token": "test-token" } }
        })))
        .mount(server)
        .await;

    let client = TagStreamClient::new(&ConnectionConfig::new(server.uri()))
        .expect("client should build against the mock server");
    client
        .connect(&Credentials { username: "analyst".to_string(), password: "s3cret".to_string() })
        .await
        .expect("session handshake should succeed");
    client
}
