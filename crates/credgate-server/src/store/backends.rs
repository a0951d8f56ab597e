// SPDX-License-Identifier: Apache-2.0

use crate::config::UpstreamConfig;
use crate::store::{RecordSource, UpstreamError};
use async_trait::async_trait;
use credgate_model::Record;
use serde::Deserialize;
use tracing::instrument;

/// Wire shape of the upstream list endpoint.
#[derive(Debug, Deserialize)]
struct RecordPage {
    list: Vec<Record>,
}

/// Reads the certification table over the tabular-database HTTP API,
/// authenticated with a static `xc-token` header.
pub struct TableApiBackend {
    config: UpstreamConfig,
    client: reqwest::Client,
}

impl TableApiBackend {
    #[must_use]
    pub fn new(config: UpstreamConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    fn records_url(&self) -> String {
        format!(
            "{}/{}/records",
            self.config.base_url.trim_end_matches('/'),
            self.config.table_id
        )
    }
}

#[async_trait]
impl RecordSource for TableApiBackend {
    fn backend_tag(&self) -> &'static str {
        "table-api"
    }

    /// One capped snapshot fetch. Callers treat the result as the complete
    /// record set; there is no upstream pagination and no retry.
    #[instrument(name = "upstream_fetch_records", skip(self), fields(table = %self.config.table_id))]
    async fn fetch_records(&self) -> Result<Vec<Record>, UpstreamError> {
        let response = self
            .client
            .get(self.records_url())
            .query(&[("limit", self.config.fetch_limit.to_string())])
            .header("xc-token", &self.config.api_token)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(format!("upstream request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::status(status.as_u16(), body));
        }

        let page: RecordPage = response
            .json()
            .await
            .map_err(|e| UpstreamError::transport(format!("upstream body decode failed: {e}")))?;
        Ok(page.list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_url_joins_base_table_and_resource() {
        let backend = TableApiBackend::new(UpstreamConfig {
            base_url: "https://records.example/api/v2/tables/".to_string(),
            api_token: "t".to_string(),
            table_id: "tbl123".to_string(),
            ..UpstreamConfig::default()
        });
        assert_eq!(
            backend.records_url(),
            "https://records.example/api/v2/tables/tbl123/records"
        );
    }

    #[test]
    fn record_page_requires_the_list_property() {
        let ok: Result<RecordPage, _> = serde_json::from_str(r#"{"list": []}"#);
        assert!(ok.is_ok());
        let missing: Result<RecordPage, _> = serde_json::from_str(r#"{"rows": []}"#);
        assert!(missing.is_err());
    }
}
