//! Sequential batch submission with partial-failure accounting

use tagstream_domain::{
    ApiResponse, BulkUploadResult, Result, TagStreamError, TagUploadBatch, UploadOptions,
};
use tracing::{debug, info};

use crate::batch::builder::TagBatchBuilder;
use crate::ports::TagUploadSink;

/// Drives the batch builder against an upload sink, one batch at a time.
///
/// Batches are submitted strictly sequentially - batch N+1 is not started
/// until batch N's response is observed - so success and failure always map
/// to a contiguous prefix of the input. Nothing is retried or rolled back; a
/// failure after at least one submitted batch surfaces as
/// [`TagStreamError::PartialUpload`] and the caller must reconcile.
pub struct BulkTagUploader<'a> {
    sink: &'a dyn TagUploadSink,
}

impl<'a> BulkTagUploader<'a> {
    pub fn new(sink: &'a dyn TagUploadSink) -> Self {
        Self { sink }
    }

    /// Validate, batch, and upload a sparse row set into one channel.
    ///
    /// Each row is `[entity, tag, tag, ...]`. The returned result keeps only
    /// the last batch's response plus aggregate counters; empty valid input
    /// completes trivially with `last_response = None` and no sink calls.
    pub async fn upload_rows(
        &self,
        rows: &[Vec<String>],
        channel_id: i64,
        options: UploadOptions,
    ) -> Result<BulkUploadResult> {
        let mut builder = TagBatchBuilder::new(channel_id, options.stop_on_invalid_data);
        let mut batches_submitted = 0usize;
        let mut pairs_uploaded = 0usize;
        let mut last_response: Option<ApiResponse> = None;

        for row in rows {
            let row_result = builder.push_row(row);
            for batch in &row_result.ready {
                last_response = Some(self.submit(batch, batches_submitted).await?);
                batches_submitted += 1;
                pairs_uploaded += batch.len();
            }
            if let Some(abort) = row_result.abort {
                return Err(Self::attribute_abort(abort, batches_submitted));
            }
        }

        if let Some(batch) = builder.finish() {
            last_response = Some(self.submit(&batch, batches_submitted).await?);
            batches_submitted += 1;
            pairs_uploaded += batch.len();
        }

        info!(
            channel_id,
            batches_submitted, pairs_uploaded, "bulk tag upload complete"
        );

        Ok(BulkUploadResult {
            last_response,
            batches_submitted,
            pairs_uploaded,
            rejected: builder.into_rejected(),
        })
    }

    async fn submit(&self, batch: &TagUploadBatch, batches_submitted: usize) -> Result<ApiResponse> {
        debug!(batch = batches_submitted, pairs = batch.len(), "submitting tag batch");
        self.sink.upload_batch(batch).await.map_err(|err| {
            if batches_submitted > 0 {
                TagStreamError::PartialUpload {
                    batches_submitted,
                    pairs_in_failed_batch: batch.len(),
                    source: Box::new(err),
                }
            } else {
                err
            }
        })
    }

    /// A validation abort after submitted batches is still a partial upload;
    /// before any submission it surfaces as the plain validation error.
    fn attribute_abort(abort: TagStreamError, batches_submitted: usize) -> TagStreamError {
        if batches_submitted > 0 {
            TagStreamError::PartialUpload {
                batches_submitted,
                pairs_in_failed_batch: 0,
                source: Box::new(abort),
            }
        } else {
            abort
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tagstream_domain::constants::MAX_TAG_ENTITIES_PER_REQUEST;

    use super::*;

    /// Records every submitted batch size; fails from a given call index on.
    struct RecordingSink {
        sizes: Mutex<Vec<usize>>,
        fail_from: Option<usize>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self { sizes: Mutex::new(Vec::new()), fail_from: None }
        }

        fn failing_from(call: usize) -> Self {
            Self { sizes: Mutex::new(Vec::new()), fail_from: Some(call) }
        }

        fn sizes(&self) -> Vec<usize> {
            self.sizes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TagUploadSink for RecordingSink {
        async fn upload_batch(&self, batch: &TagUploadBatch) -> Result<ApiResponse> {
            let mut sizes = self.sizes.lock().unwrap();
            let call = sizes.len();
            if self.fail_from.is_some_and(|from| call >= from) {
                return Err(TagStreamError::Api {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            sizes.push(batch.len());
            Ok(ApiResponse {
                status: 201,
                body: serde_json::json!({ "batch": call }),
            })
        }
    }

    fn rows_with_pairs(count: usize) -> Vec<Vec<String>> {
        // one row per pair keeps the traversal simple
        (0..count)
            .map(|i| vec!["1.2.3.4".to_string(), format!("t{i}")])
            .collect()
    }

    #[tokio::test]
    async fn splits_4001_pairs_into_three_batches() {
        let sink = RecordingSink::new();
        let uploader = BulkTagUploader::new(&sink);

        let rows = rows_with_pairs(2 * MAX_TAG_ENTITIES_PER_REQUEST + 1);
        let result = uploader.upload_rows(&rows, 1, UploadOptions::default()).await.unwrap();

        assert_eq!(sink.sizes(), vec![2000, 2000, 1]);
        assert_eq!(result.batches_submitted, 3);
        assert_eq!(result.pairs_uploaded, 4001);
        // only the last batch's response is retained
        assert_eq!(result.last_response.unwrap().body["batch"], 2);
    }

    #[tokio::test]
    async fn empty_input_makes_no_calls() {
        let sink = RecordingSink::new();
        let uploader = BulkTagUploader::new(&sink);

        let result = uploader.upload_rows(&[], 1, UploadOptions::default()).await.unwrap();

        assert!(sink.sizes().is_empty());
        assert!(result.last_response.is_none());
        assert_eq!(result.batches_submitted, 0);
    }

    #[tokio::test]
    async fn default_policy_drops_invalid_row_and_reports_it() {
        let sink = RecordingSink::new();
        let uploader = BulkTagUploader::new(&sink);

        let bad_entity = format!("bad entity {}", "x".repeat(300));
        let rows = vec![
            vec!["1.2.3.4".to_string(), "t1".to_string(), "t2".to_string()],
            vec![bad_entity, "t3".to_string()],
        ];
        let result = uploader.upload_rows(&rows, 1, UploadOptions::default()).await.unwrap();

        assert_eq!(sink.sizes(), vec![2]);
        assert_eq!(result.pairs_uploaded, 2);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].row, 1);
    }

    #[tokio::test]
    async fn stop_mode_abort_before_any_flush_uploads_nothing() {
        let sink = RecordingSink::new();
        let uploader = BulkTagUploader::new(&sink);

        // invalid row second; row 0's two pairs are still buffered, so the
        // abort discards them entirely
        let rows = vec![
            vec!["1.2.3.4".to_string(), "t1".to_string(), "t2".to_string()],
            vec![String::new(), "t3".to_string()],
        ];
        let options = UploadOptions { stop_on_invalid_data: true };
        let err = uploader.upload_rows(&rows, 1, options).await.unwrap_err();

        assert!(matches!(err, TagStreamError::Validation(_)));
        assert!(sink.sizes().is_empty());
    }

    #[tokio::test]
    async fn stop_mode_abort_first_row_uploads_nothing() {
        let sink = RecordingSink::new();
        let uploader = BulkTagUploader::new(&sink);

        let rows = vec![
            vec![String::new(), "t0".to_string()],
            vec!["1.2.3.4".to_string(), "t1".to_string()],
        ];
        let options = UploadOptions { stop_on_invalid_data: true };
        let err = uploader.upload_rows(&rows, 1, options).await.unwrap_err();

        assert!(matches!(err, TagStreamError::Validation(_)));
        assert!(sink.sizes().is_empty());
    }

    #[tokio::test]
    async fn stop_mode_abort_after_flushed_batch_is_partial() {
        let sink = RecordingSink::new();
        let uploader = BulkTagUploader::new(&sink);

        // first row alone fills a whole batch, which flushes before the
        // invalid second row is reached
        let mut first = vec!["1.2.3.4".to_string()];
        first.extend((0..MAX_TAG_ENTITIES_PER_REQUEST).map(|i| format!("t{i}")));
        let rows = vec![first, vec![String::new(), "t".to_string()]];

        let options = UploadOptions { stop_on_invalid_data: true };
        let err = uploader.upload_rows(&rows, 1, options).await.unwrap_err();

        match err {
            TagStreamError::PartialUpload { batches_submitted, source, .. } => {
                assert_eq!(batches_submitted, 1);
                assert!(matches!(*source, TagStreamError::Validation(_)));
            }
            other => panic!("expected partial upload, got {other:?}"),
        }
        assert_eq!(sink.sizes(), vec![2000]);
    }

    #[tokio::test]
    async fn sink_failure_after_success_is_partial() {
        let sink = RecordingSink::failing_from(1);
        let uploader = BulkTagUploader::new(&sink);

        let rows = rows_with_pairs(MAX_TAG_ENTITIES_PER_REQUEST + 1);
        let err = uploader.upload_rows(&rows, 1, UploadOptions::default()).await.unwrap_err();

        match err {
            TagStreamError::PartialUpload {
                batches_submitted,
                pairs_in_failed_batch,
                source,
            } => {
                assert_eq!(batches_submitted, 1);
                assert_eq!(pairs_in_failed_batch, 1);
                assert!(matches!(*source, TagStreamError::Api { status: 500, .. }));
            }
            other => panic!("expected partial upload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn first_batch_failure_is_not_partial() {
        let sink = RecordingSink::failing_from(0);
        let uploader = BulkTagUploader::new(&sink);

        let rows = rows_with_pairs(3);
        let err = uploader.upload_rows(&rows, 1, UploadOptions::default()).await.unwrap_err();

        assert!(matches!(err, TagStreamError::Api { status: 500, .. }));
    }
}
