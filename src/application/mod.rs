pub mod use_cases;

pub use use_cases::export_coordinator::{ExportConfirmation, ExportCoordinator};
pub use use_cases::filter_strategy::FilterStrategy;
pub use use_cases::report_controller::ReportDataController;
pub use use_cases::sort_strategy::SortStrategy;
