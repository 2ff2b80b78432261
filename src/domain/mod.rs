pub mod error;
pub mod export;
pub mod report_config;
pub mod report_state;
pub mod sort_config;
