//! Report data controller: state coordination for paginated, filterable,
//! sortable tabular reports backed by a remote JSON endpoint, plus the CSV
//! export trigger that snapshots the active filters into a server-side job.
//!
//! Renderers (table, pagination, filter dropdowns) stay outside this crate;
//! they read the controller's derived view state and call back into its
//! operations on user interaction. The endpoints sit behind the
//! [`ReportSource`] and [`ExportSink`] traits, with a `reqwest`-backed
//! [`HttpReportClient`] as the stock implementation.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::use_cases::export_coordinator::{
    ExportConfirmation, ExportCoordinator, DEFAULT_EXPORT_URL,
};
pub use application::use_cases::filter_strategy::FilterStrategy;
pub use application::use_cases::report_controller::{FetchSuccessHook, ReportDataController};
pub use application::use_cases::sort_strategy::SortStrategy;
pub use domain::error::{ReportError, Result};
pub use domain::export::ExportRequest;
pub use domain::report_config::{ColumnDefinition, FilterDefinition, ReportConfig};
pub use domain::report_state::{FilterOption, ReportState};
pub use domain::sort_config::{ActiveSort, SortConfig, SortDirection, SortRule};
pub use infrastructure::http::{
    build_report_query, ExportSink, HttpReportClient, ReportQueryParams, ReportSource,
};
