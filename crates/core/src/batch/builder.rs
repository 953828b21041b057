//! Streaming row validation and batch accumulation

use std::mem;

use tagstream_domain::constants::MAX_TAG_ENTITIES_PER_REQUEST;
use tagstream_domain::{RejectedCell, TagEntityPair, TagStreamError, TagUploadBatch};
use tracing::debug;

use crate::validation::address::classify_entity;
use crate::validation::fields;

/// What one row contributed to the pipeline.
///
/// Batches fill in traversal order, so a row can both complete a batch and
/// then hit a validation abort; `ready` batches were complete before the
/// offending cell and must still be submitted, while the abort discards only
/// the unflushed buffer.
#[derive(Debug, Default)]
pub struct RowResult {
    /// Batches that reached the size cap while processing this row.
    pub ready: Vec<TagUploadBatch>,
    /// Validation failure that aborts the operation (stop mode only).
    pub abort: Option<TagStreamError>,
}

/// Converts rows of `[entity, tag, tag, ...]` into ordered batches of
/// tag-entity pairs, capped at `MAX_TAG_ENTITIES_PER_REQUEST`.
///
/// Rows are consumed in order and pairs keep row/column traversal order, so
/// a failure of batch N is attributable to a contiguous prefix of the input.
/// Under the default policy an invalid entity silently drops its whole row
/// and an invalid tag drops just that cell; both are recorded as
/// [`RejectedCell`]s. With `stop_on_invalid_data` the first invalid value
/// aborts the operation instead.
pub struct TagBatchBuilder {
    channel_id: i64,
    stop_on_invalid_data: bool,
    current: Vec<TagEntityPair>,
    rejected: Vec<RejectedCell>,
    row_index: usize,
}

impl TagBatchBuilder {
    pub fn new(channel_id: i64, stop_on_invalid_data: bool) -> Self {
        Self {
            channel_id,
            stop_on_invalid_data,
            current: Vec::new(),
            rejected: Vec::new(),
            row_index: 0,
        }
    }

    /// Validate one row, accumulating pairs and emitting full batches.
    pub fn push_row(&mut self, row: &[String]) -> RowResult {
        let row_index = self.row_index;
        self.row_index += 1;

        let mut result = RowResult::default();
        let Some(raw_entity) = row.first() else {
            return result;
        };

        let entity = raw_entity.trim();
        if let Err(err) = fields::validate_entity_name(entity) {
            if self.stop_on_invalid_data {
                self.current.clear();
                result.abort = Some(err);
                return result;
            }
            debug!(row = row_index, reason = %err, "skipping row with invalid entity");
            self.rejected.push(RejectedCell {
                row: row_index,
                column: 0,
                value: entity.to_string(),
                reason: err.to_string(),
            });
            return result;
        }

        let entity_type = classify_entity(entity);

        for (offset, raw_tag) in row.iter().skip(1).enumerate() {
            let tag = raw_tag.trim();
            if let Err(err) = fields::validate_tag_name(tag) {
                if self.stop_on_invalid_data {
                    self.current.clear();
                    result.abort = Some(err);
                    return result;
                }
                debug!(row = row_index, column = offset + 1, reason = %err, "skipping invalid tag");
                self.rejected.push(RejectedCell {
                    row: row_index,
                    column: offset + 1,
                    value: tag.to_string(),
                    reason: err.to_string(),
                });
                continue;
            }

            self.current.push(TagEntityPair {
                entity: entity.to_string(),
                tag: tag.to_string(),
                entity_type,
                channel_ids: vec![self.channel_id],
            });

            if self.current.len() == MAX_TAG_ENTITIES_PER_REQUEST {
                result.ready.push(TagUploadBatch::new(mem::take(&mut self.current)));
            }
        }

        result
    }

    /// Flush the remaining non-empty batch after all rows were pushed.
    pub fn finish(&mut self) -> Option<TagUploadBatch> {
        if self.current.is_empty() {
            None
        } else {
            Some(TagUploadBatch::new(mem::take(&mut self.current)))
        }
    }

    /// Cells dropped so far under the default policy.
    pub fn rejected(&self) -> &[RejectedCell] {
        &self.rejected
    }

    /// Consume the builder and take the rejection list.
    pub fn into_rejected(self) -> Vec<RejectedCell> {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use tagstream_domain::EntityType;

    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn builds_pairs_with_derived_entity_type() {
        let mut builder = TagBatchBuilder::new(7, false);
        let result = builder.push_row(&row(&["1.2.3.4", "t1", "t2"]));
        assert!(result.ready.is_empty());
        assert!(result.abort.is_none());

        let batch = builder.finish().expect("one batch");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.pairs[0].entity, "1.2.3.4");
        assert_eq!(batch.pairs[0].entity_type, EntityType::Ip);
        assert_eq!(batch.pairs[0].tag, "t1");
        assert_eq!(batch.pairs[1].tag, "t2");
        assert_eq!(batch.pairs[0].channel_ids, vec![7]);
    }

    #[test]
    fn trims_entities_and_tags() {
        let mut builder = TagBatchBuilder::new(1, false);
        builder.push_row(&row(&["  example.com  ", "  spaced tag  "]));
        let batch = builder.finish().expect("one batch");
        assert_eq!(batch.pairs[0].entity, "example.com");
        assert_eq!(batch.pairs[0].entity_type, EntityType::String);
        assert_eq!(batch.pairs[0].tag, "spaced tag");
    }

    #[test]
    fn invalid_entity_drops_whole_row_by_default() {
        let mut builder = TagBatchBuilder::new(1, false);
        builder.push_row(&row(&["1.2.3.4", "t1", "t2"]));
        let bad_entity = format!("bad entity {}", "x".repeat(300));
        let result = builder.push_row(&row(&[&bad_entity, "t3"]));
        assert!(result.abort.is_none());

        let batch = builder.finish().expect("one batch");
        assert_eq!(batch.len(), 2);
        assert!(batch.pairs.iter().all(|p| p.entity == "1.2.3.4"));

        assert_eq!(builder.rejected().len(), 1);
        assert_eq!(builder.rejected()[0].row, 1);
        assert_eq!(builder.rejected()[0].column, 0);
    }

    #[test]
    fn invalid_tag_drops_only_that_cell() {
        let mut builder = TagBatchBuilder::new(1, false);
        let long_tag = "x".repeat(2101);
        builder.push_row(&row(&["1.2.3.4", "t1", &long_tag, "t3"]));

        let batch = builder.finish().expect("one batch");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.pairs[0].tag, "t1");
        assert_eq!(batch.pairs[1].tag, "t3");

        assert_eq!(builder.rejected().len(), 1);
        assert_eq!(builder.rejected()[0].column, 2);
    }

    #[test]
    fn stop_on_invalid_aborts_and_discards_buffer() {
        let mut builder = TagBatchBuilder::new(1, true);
        builder.push_row(&row(&["1.2.3.4", "t1", "t2"]));

        let result = builder.push_row(&row(&["", "t3"]));
        let abort = result.abort.expect("abort");
        assert!(abort.to_string().contains("entity"));

        // the buffered pairs from row 0 are gone with it
        assert!(builder.finish().is_none());
    }

    #[test]
    fn stop_on_invalid_tag_also_aborts() {
        let mut builder = TagBatchBuilder::new(1, true);
        let long_tag = "x".repeat(2101);
        let result = builder.push_row(&row(&["1.2.3.4", &long_tag]));
        assert!(result.abort.expect("abort").to_string().contains("tag"));
    }

    #[test]
    fn batch_filled_before_abort_in_same_row_still_emerges() {
        let mut builder = TagBatchBuilder::new(1, true);
        let mut cells = vec!["1.2.3.4".to_string()];
        cells.extend((0..MAX_TAG_ENTITIES_PER_REQUEST).map(|i| format!("t{i}")));
        cells.push("x".repeat(2101)); // invalid, after the batch boundary

        let result = builder.push_row(&cells);
        assert_eq!(result.ready.len(), 1);
        assert_eq!(result.ready[0].len(), MAX_TAG_ENTITIES_PER_REQUEST);
        assert!(result.abort.is_some());
        assert!(builder.finish().is_none());
    }

    #[test]
    fn entity_only_row_contributes_nothing() {
        let mut builder = TagBatchBuilder::new(1, false);
        builder.push_row(&row(&["1.2.3.4"]));
        assert!(builder.finish().is_none());
        assert!(builder.rejected().is_empty());
    }

    #[test]
    fn flushes_at_batch_cap() {
        let mut builder = TagBatchBuilder::new(1, false);
        let mut cells = vec!["1.2.3.4".to_string()];
        cells.extend((0..=MAX_TAG_ENTITIES_PER_REQUEST).map(|i| format!("t{i}")));

        let result = builder.push_row(&cells);
        assert_eq!(result.ready.len(), 1);
        assert_eq!(result.ready[0].len(), MAX_TAG_ENTITIES_PER_REQUEST);

        let rest = builder.finish().expect("remainder");
        assert_eq!(rest.len(), 1);
        assert_eq!(rest.pairs[0].tag, format!("t{MAX_TAG_ENTITIES_PER_REQUEST}"));
    }
}
