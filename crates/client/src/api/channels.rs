//! Channel endpoints: create, clear (with polling), and the empty probe

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tagstream_core::{ChannelEmptyProbe, ClearPoller};
use tagstream_domain::constants::CLEAR_POLL_INTERVAL_MS;
use tagstream_domain::{Channel, ClearOutcome, Result, TagStreamError};
use tracing::info;

use super::client::TagStreamClient;

impl TagStreamClient {
    /// Create a channel. The server answers 201 with the new resource.
    pub async fn create_channel(&self, name: &str, description: Option<&str>) -> Result<Channel> {
        let body = json!({
            "data": {
                "type": "channels",
                "attributes": {
                    "name": name,
                    "description": description,
                }
            }
        });

        let response = self.send(Method::POST, "/v2/channels", &[], Some(&body), true).await?;
        let data = Self::data(Self::expect_status(response, 201)?)?;

        let id = parse_resource_id(&data)?;
        info!(channel_id = id, name, "channel created");
        Ok(Channel {
            id,
            name: data
                .pointer("/attributes/name")
                .and_then(Value::as_str)
                .unwrap_or(name)
                .to_string(),
            description: data
                .pointer("/attributes/description")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// Clear all tagged entities out of a channel.
    ///
    /// A 200 completes synchronously. A 202 means the server is still
    /// working: with `wait_until_complete` the call polls the channel-empty
    /// check every 30 seconds until the channel drains, otherwise it returns
    /// immediately with `clear_complete = false` and timeout metadata.
    pub async fn clear_channel(
        &self,
        channel_id: i64,
        wait_until_complete: bool,
    ) -> Result<ClearOutcome> {
        self.clear_channel_with_interval(
            channel_id,
            wait_until_complete,
            Duration::from_millis(CLEAR_POLL_INTERVAL_MS),
        )
        .await
    }

    /// [`clear_channel`](Self::clear_channel) with an explicit poll interval.
    pub async fn clear_channel_with_interval(
        &self,
        channel_id: i64,
        wait_until_complete: bool,
        poll_interval: Duration,
    ) -> Result<ClearOutcome> {
        self.require_session().await?;

        let path = format!("/v2/channels/{channel_id}");
        let initial = self
            .send(
                Method::DELETE,
                &path,
                &[("option[clearChannel]", "true".to_string())],
                None,
                true,
            )
            .await?;

        let mut poller = ClearPoller::new(self).with_poll_interval(poll_interval);
        poller.resolve(channel_id, initial, wait_until_complete).await
    }
}

#[async_trait]
impl ChannelEmptyProbe for TagStreamClient {
    /// Zero-count lookup of a single entity scoped to the channel, scanning
    /// entities only, across all users. Empty iff `data` has no elements.
    async fn is_empty(&self, channel_id: i64) -> Result<bool> {
        let query: [(&str, String); 10] = [
            ("option[count]", "false".to_string()),
            ("option[searchTags]", "false".to_string()),
            ("option[searchComments]", "false".to_string()),
            ("option[searchEntities]", "true".to_string()),
            ("option[searchAllUsers]", "true".to_string()),
            ("option[searchLoggedInUser]", "false".to_string()),
            ("option[searchSelectedUsers]", "false".to_string()),
            ("page[number]", "1".to_string()),
            ("page[size]", "1".to_string()),
            ("filter[tag-entity-pair.channel-id]", channel_id.to_string()),
        ];

        let response = self.send(Method::GET, "/v2/searchable-items", &query, None, true).await?;
        let data = Self::data(Self::expect_status(response, 200)?)?;

        data.as_array().map(Vec::is_empty).ok_or_else(|| {
            TagStreamError::Internal("searchable-items data member is not an array".into())
        })
    }
}

fn parse_resource_id(data: &Value) -> Result<i64> {
    let id = data.get("id").ok_or_else(|| {
        TagStreamError::Internal("resource missing id member".into())
    })?;

    match id {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| TagStreamError::Internal(format!("non-integer resource id: {n}"))),
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| TagStreamError::Internal(format!("non-numeric resource id: {s}"))),
        other => Err(TagStreamError::Internal(format!("unexpected resource id: {other}"))),
    }
}
