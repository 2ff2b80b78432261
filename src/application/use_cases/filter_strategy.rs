use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::report_state::FilterOption;

/// Holds the current value for each filterable field and derives the
/// request-ready filter map. No network access; the controller sequences
/// the refetch after a change.
#[derive(Debug, Default)]
pub struct FilterStrategy {
    active: BTreeMap<String, Value>,
}

impl FilterStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the selected value for a declared filter field. An empty
    /// string means "no filter" for that field. Callers pass only declared
    /// field names.
    pub fn select_field(&mut self, field: &str, value: Value) {
        self.active.insert(field.to_string(), value);
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.active.get(field)
    }

    /// Clone of the active filter map, used for request building and for
    /// export snapshots.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.active.clone()
    }

    /// Builds a dropdown option list from a reference-record list: the
    /// synthetic "all" option first, then one option per record in input
    /// order. Duplicate records produce duplicate options; callers
    /// pre-deduplicate if they want distinct entries.
    pub fn filter_options(
        records: &[Value],
        label_field: &str,
        value_field: &str,
        all_label: &str,
    ) -> Vec<FilterOption> {
        let mut options = Vec::with_capacity(records.len() + 1);
        options.push(FilterOption {
            name: all_label.to_string(),
            value: Value::String(String::new()),
        });
        for record in records {
            let label = &record[label_field];
            options.push(FilterOption {
                name: label
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| label.to_string()),
                value: record[value_field].clone(),
            });
        }
        options
    }
}
