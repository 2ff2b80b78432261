use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::export::ExportRequest;
use crate::infrastructure::http::ExportSink;

pub const DEFAULT_EXPORT_URL: &str = "/teachers/progress_reports/csv_exports";

/// Surface that tells the user the export was queued, e.g. a modal naming
/// the address the CSV will be mailed to. Injected, never looked up.
pub trait ExportConfirmation: Send + Sync {
    fn open(&self, teacher_email: Option<&str>);
}

/// Snapshots current filter state into an asynchronous export job. The job
/// itself runs server-side; this coordinator only submits and confirms.
pub struct ExportCoordinator {
    request_url: String,
    sink: Arc<dyn ExportSink>,
    confirmation: Arc<dyn ExportConfirmation>,
}

impl ExportCoordinator {
    pub fn new(sink: Arc<dyn ExportSink>, confirmation: Arc<dyn ExportConfirmation>) -> Self {
        Self {
            request_url: DEFAULT_EXPORT_URL.to_string(),
            sink,
            confirmation,
        }
    }

    pub fn with_request_url(mut self, url: impl Into<String>) -> Self {
        self.request_url = url.into();
        self
    }

    /// Submits `{csv_export: {export_type, filters}}`. On acknowledgment the
    /// confirmation surface opens with the teacher's email; on failure the
    /// request is dropped with no retry and no state change, so the only
    /// user-visible signal is the absent confirmation.
    pub async fn create_export(
        &self,
        export_type: &str,
        filters: &BTreeMap<String, Value>,
        teacher: &Value,
    ) {
        let request = ExportRequest::new(export_type, filters.clone());
        match self.sink.submit_export(&self.request_url, &request.body()).await {
            Ok(()) => {
                let email = teacher.get("email").and_then(Value::as_str);
                self.confirmation.open(email);
            }
            Err(err) => {
                tracing::debug!("csv export submission dropped: {}", err);
            }
        }
    }
}
