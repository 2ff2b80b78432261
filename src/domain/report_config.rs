use serde::{Deserialize, Serialize};

use crate::domain::report_state::FilterOption;

/// Column spec passed through to the external table renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Header label.
    pub name: String,

    /// Row field the column reads.
    pub field: String,

    /// Sort key activated by clicking the header, if the column is sortable.
    pub sort_field: Option<String>,
}

/// One filterable dimension of the report, supplied at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterDefinition {
    /// Request parameter name, e.g. "classroom_id".
    pub field: String,

    /// Key of the payload reference list the option set is derived from,
    /// e.g. "classrooms".
    pub source_key: String,

    /// Label of the synthetic first option, e.g. "All Classrooms".
    pub all_label: String,
}

impl FilterDefinition {
    /// The "no filter" option every derived option set starts with.
    pub fn default_option(&self) -> FilterOption {
        FilterOption {
            name: self.all_label.clone(),
            value: serde_json::Value::String(String::new()),
        }
    }
}

/// Construction surface of a report instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Read endpoint for report rows and reference lists.
    pub source_url: String,

    /// Payload key the result rows live under. Varies per report type.
    pub results_key: String,

    /// Column specs, passed through untouched to the table renderer.
    pub columns: Vec<ColumnDefinition>,

    /// Filterable dimensions, in display order.
    pub filters: Vec<FilterDefinition>,

    /// Paginated reports refetch on filter/sort/page changes; unpaginated
    /// reports fetch once and re-sort client-side.
    pub pagination: bool,

    /// Export type submitted to the CSV export endpoint, when the report
    /// offers an export.
    pub export_csv: Option<String>,

    /// Upper bound on page links shown by the pagination renderer.
    #[serde(default = "default_max_page_number")]
    pub max_page_number: u32,
}

fn default_max_page_number() -> u32 {
    4
}
