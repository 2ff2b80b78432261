use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

/// Snapshot of an export click. Built per submission and not retained after
/// the endpoint acknowledges or fails.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest {
    pub export_type: String,
    pub filters: BTreeMap<String, Value>,
}

impl ExportRequest {
    pub fn new(export_type: impl Into<String>, filters: BTreeMap<String, Value>) -> Self {
        Self {
            export_type: export_type.into(),
            filters,
        }
    }

    /// Body submitted to the export endpoint.
    pub fn body(&self) -> Value {
        json!({
            "csv_export": {
                "export_type": self.export_type,
                "filters": self.filters,
            }
        })
    }
}
