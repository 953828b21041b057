//! User endpoints

use reqwest::Method;
use serde_json::Value;
use tagstream_domain::{Result, TagStreamError};

use super::client::TagStreamClient;

/// A server-side user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl TagStreamClient {
    /// List the server's user accounts.
    pub async fn get_users(&self) -> Result<Vec<User>> {
        let response = self.send(Method::GET, "/v2/users", &[], None, true).await?;
        let data = Self::data(Self::expect_status(response, 200)?)?;

        let resources = data.as_array().ok_or_else(|| {
            TagStreamError::Internal("users data member is not an array".into())
        })?;

        resources.iter().map(parse_user).collect()
    }
}

fn parse_user(resource: &Value) -> Result<User> {
    let id = resource
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| TagStreamError::Internal("user resource missing id".into()))?;
    let name = resource
        .pointer("/attributes/name")
        .and_then(Value::as_str)
        .unwrap_or_default();

    Ok(User { id: id.to_string(), name: name.to_string() })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::test_support::connected_client;

    #[tokio::test]
    async fn lists_users() {
        let server = MockServer::start().await;
        let client = connected_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/v2/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "id": "1", "type": "users", "attributes": { "name": "alice" } },
                    { "id": "2", "type": "users", "attributes": { "name": "bob" } }
                ]
            })))
            .mount(&server)
            .await;

        let users = client.get_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0], User { id: "1".to_string(), name: "alice".to_string() });
        assert_eq!(users[1].name, "bob");
    }
}
