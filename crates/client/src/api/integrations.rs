//! Integration endpoints
//!
//! Integrations are server-side pluggable data-source modules, referenced by
//! an opaque id derived from the module's directory name.

use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Method;
use serde_json::{json, Value};
use tagstream_domain::constants::MAX_CONCURRENT_INTEGRATION_LOOKUPS;
use tagstream_domain::Result;
use tracing::info;

use super::client::TagStreamClient;

/// One integration's contribution to a multi-integration search.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationSearchResult {
    pub integration_id: String,
    pub data: Value,
}

impl TagStreamClient {
    /// Restart a server-side integration.
    pub async fn restart_integration(&self, integration_id: &str) -> Result<()> {
        let path = format!("/v2/integrations/{integration_id}/restart");
        let response = self.send(Method::POST, &path, &[], None, true).await?;
        Self::expect_status(response, 200)?;
        info!(integration_id, "integration restarted");
        Ok(())
    }

    /// Update a single configuration option of an integration.
    pub async fn update_integration_option(
        &self,
        integration_id: &str,
        option: &str,
        value: &Value,
    ) -> Result<()> {
        let path = format!("/v2/integrations/{integration_id}");
        let body = json!({
            "data": {
                "type": "integrations",
                "id": integration_id,
                "attributes": { "options": { option: value } }
            }
        });

        let response = self.send(Method::PATCH, &path, &[], Some(&body), true).await?;
        Self::expect_status(response, 200)?;
        info!(integration_id, option, "integration option updated");
        Ok(())
    }

    /// Run the same search against several integrations.
    ///
    /// Lookups fan out with at most `MAX_CONCURRENT_INTEGRATION_LOOKUPS`
    /// in flight; results come back in the order of `integration_ids`.
    pub async fn search_integrations(
        &self,
        integration_ids: &[String],
        term: &str,
    ) -> Result<Vec<IntegrationSearchResult>> {
        self.require_session().await?;

        stream::iter(integration_ids.iter().map(|id| self.search_one(id, term)))
            .buffered(MAX_CONCURRENT_INTEGRATION_LOOKUPS)
            .try_collect()
            .await
    }

    async fn search_one(&self, integration_id: &str, term: &str) -> Result<IntegrationSearchResult> {
        let path = format!("/v2/integrations/{integration_id}/search");
        let response = self
            .send(Method::GET, &path, &[("filter[term]", term.to_string())], None, true)
            .await?;
        let data = Self::data(Self::expect_status(response, 200)?)?;

        Ok(IntegrationSearchResult { integration_id: integration_id.to_string(), data })
    }
}
