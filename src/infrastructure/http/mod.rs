use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::{ReportError, Result};
use crate::domain::sort_config::SortDirection;

/// Read side of the report endpoint. Returns the raw payload; the results
/// key varies per report type, so extraction happens in the controller.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_report(&self, url: &str, query: &[(String, String)]) -> Result<Value>;
}

/// Submission side of the CSV export endpoint.
#[async_trait]
pub trait ExportSink: Send + Sync {
    async fn submit_export(&self, url: &str, body: &Value) -> Result<()>;
}

/// Typed input for [`build_report_query`].
#[derive(Debug)]
pub struct ReportQueryParams<'a> {
    pub filters: &'a BTreeMap<String, Value>,
    pub page: Option<u32>,
    pub sort: Option<(String, SortDirection)>,
}

/// Builds the full query string for a report fetch in one pass: active
/// filters, then `page` when paginated, then the sort token pair.
/// Empty-string filter values mean "no filter" and are left out of the
/// request entirely.
pub fn build_report_query(params: &ReportQueryParams<'_>) -> Vec<(String, String)> {
    let mut query = Vec::with_capacity(params.filters.len() + 3);
    for (field, value) in params.filters {
        match value {
            Value::String(s) if s.is_empty() => {}
            Value::String(s) => query.push((field.clone(), s.clone())),
            Value::Null => {}
            other => query.push((field.clone(), other.to_string())),
        }
    }
    if let Some(page) = params.page {
        query.push(("page".to_string(), page.to_string()));
    }
    if let Some((token, direction)) = &params.sort {
        query.push(("sort".to_string(), token.clone()));
        query.push(("direction".to_string(), direction.as_param().to_string()));
    }
    query
}

/// `reqwest`-backed implementation of both endpoint traits.
pub struct HttpReportClient {
    client: reqwest::Client,
}

impl HttpReportClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpReportClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportSource for HttpReportClient {
    async fn fetch_report(&self, url: &str, query: &[(String, String)]) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ReportError::Fetch(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ReportError::Fetch(format!(
                "Endpoint error ({}): {}",
                status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ReportError::Parse(format!("Failed to parse JSON: {}", e)))
    }
}

#[async_trait]
impl ExportSink for HttpReportClient {
    async fn submit_export(&self, url: &str, body: &Value) -> Result<()> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ReportError::Export(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ReportError::Export(format!(
                "Endpoint error ({}): {}",
                status, text
            )));
        }

        Ok(())
    }
}
