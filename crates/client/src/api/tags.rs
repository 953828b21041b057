//! Bulk tag upload endpoint
//!
//! The wire body for one batch is
//! `{ "data": [ { "type": "tag-entity-pairs", "attributes": { "type",
//! "entity", "tag", "channel-id": [..] } }, ... ] }` and the server answers
//! an accepted batch with 201.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tagstream_domain::{
    ApiResponse, BulkUploadResult, EntityType, Result, TagStreamError, TagUploadBatch,
    UploadOptions,
};
use tagstream_core::{BulkTagUploader, TagUploadSink};

#[derive(Serialize)]
struct TagUploadRequest<'a> {
    data: Vec<TagEntityResource<'a>>,
}

#[derive(Serialize)]
struct TagEntityResource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    attributes: TagEntityAttributes<'a>,
}

#[derive(Serialize)]
struct TagEntityAttributes<'a> {
    #[serde(rename = "type")]
    entity_type: EntityType,
    entity: &'a str,
    tag: &'a str,
    #[serde(rename = "channel-id")]
    channel_id: &'a [i64],
}

fn upload_body(batch: &TagUploadBatch) -> Result<serde_json::Value> {
    let request = TagUploadRequest {
        data: batch
            .pairs
            .iter()
            .map(|pair| TagEntityResource {
                kind: "tag-entity-pairs",
                attributes: TagEntityAttributes {
                    entity_type: pair.entity_type,
                    entity: &pair.entity,
                    tag: &pair.tag,
                    channel_id: &pair.channel_ids,
                },
            })
            .collect(),
    };
    serde_json::to_value(&request)
        .map_err(|err| TagStreamError::Internal(format!("failed to serialize batch: {err}")))
}

#[async_trait]
impl TagUploadSink for super::TagStreamClient {
    async fn upload_batch(&self, batch: &TagUploadBatch) -> Result<ApiResponse> {
        let body = upload_body(batch)?;
        let response = self.send(Method::POST, "/v2/tag-entity-pairs", &[], Some(&body), true).await?;

        if response.status != 201 {
            return Err(TagStreamError::Api {
                status: response.status,
                body: response.body.to_string(),
            });
        }
        Ok(response)
    }
}

impl super::TagStreamClient {
    /// Validate, batch, and upload a sparse row set into one channel.
    ///
    /// Each row is `[entity, tag, tag, ...]`. Batches of up to 2000 pairs go
    /// out sequentially; see [`BulkTagUploader`] for the partial-failure and
    /// stop-on-invalid semantics.
    pub async fn upload_tags(
        &self,
        rows: &[Vec<String>],
        channel_id: i64,
        options: UploadOptions,
    ) -> Result<BulkUploadResult> {
        // fail the precondition before doing any validation work
        self.require_session().await?;
        BulkTagUploader::new(self).upload_rows(rows, channel_id, options).await
    }
}
