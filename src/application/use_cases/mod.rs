pub mod export_coordinator;
pub mod filter_strategy;
pub mod report_controller;
pub mod sort_strategy;
