use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single entry in a filter dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub name: String,
    pub value: Value,
}

/// Report state owned exclusively by the controller. Mutated only through
/// the controller's operations, read by renderers through its accessors.
#[derive(Debug, Clone)]
pub struct ReportState<R> {
    pub(crate) current_page: u32,
    pub(crate) num_pages: u32,
    pub(crate) loading: bool,
    pub(crate) results: Vec<R>,
    pub(crate) filter_option_sets: BTreeMap<String, Vec<FilterOption>>,
    pub(crate) teacher: Value,
}

impl<R> Default for ReportState<R> {
    fn default() -> Self {
        Self {
            current_page: 1,
            num_pages: 1,
            loading: false,
            results: Vec::new(),
            filter_option_sets: BTreeMap::new(),
            teacher: Value::Null,
        }
    }
}
