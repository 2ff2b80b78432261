use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::application::use_cases::filter_strategy::FilterStrategy;
use crate::application::use_cases::sort_strategy::SortStrategy;
use crate::domain::error::{ReportError, Result};
use crate::domain::export::ExportRequest;
use crate::domain::report_config::{ColumnDefinition, ReportConfig};
use crate::domain::report_state::{FilterOption, ReportState};
use crate::domain::sort_config::{ActiveSort, SortConfig};
use crate::infrastructure::http::{build_report_query, ReportQueryParams, ReportSource};

pub type FetchSuccessHook = Box<dyn Fn(&Value) + Send + Sync>;

/// Owns all report state and sequences the fetch lifecycle: mount, filter
/// changes, sort changes, page changes. Renderers never mutate state; they
/// read the derived view accessors. The endpoint is injected as a
/// [`ReportSource`], never looked up ambiently.
///
/// `R` is the row type of the specific report; it is bound only by what the
/// report's sort comparators read from it.
pub struct ReportDataController<R> {
    config: ReportConfig,
    state: ReportState<R>,
    filters: FilterStrategy,
    sorting: SortStrategy<R>,
    pending_sort: Option<SortConfig<R>>,
    source: Arc<dyn ReportSource>,
    on_fetch_success: Option<FetchSuccessHook>,
}

impl<R: DeserializeOwned + Clone> ReportDataController<R> {
    pub fn new(
        config: ReportConfig,
        sort_config: SortConfig<R>,
        source: Arc<dyn ReportSource>,
    ) -> Self {
        Self {
            config,
            state: ReportState::default(),
            filters: FilterStrategy::new(),
            sorting: SortStrategy::new(),
            pending_sort: Some(sort_config),
            source,
            on_fetch_success: None,
        }
    }

    /// Hook invoked with the raw payload after every successful fetch.
    pub fn with_fetch_hook(mut self, hook: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_fetch_success = Some(Box::new(hook));
        self
    }

    /// Registers the sort configuration, then performs the initial fetch.
    /// Fails fast if the configured default sort key is unknown.
    pub async fn mount(&mut self) -> Result<()> {
        if let Some(sort_config) = self.pending_sort.take() {
            self.sorting.define_sorting(sort_config)?;
        }
        self.fetch().await
    }

    /// Applies a filter selection. Paginated reports jump back to page 1
    /// before refetching so the request never names a page that no longer
    /// exists under the new filter; unpaginated reports refetch as-is.
    pub async fn select_filter(&mut self, field: &str, value: Value) -> Result<()> {
        self.filters.select_field(field, value);
        if self.config.pagination {
            self.state.current_page = 1;
        }
        self.fetch().await
    }

    /// Toggles or activates a sort key. Paginated reports delegate ordering
    /// to the server and must refetch; unpaginated reports re-sort the held
    /// rows lazily in [`visible_results`](Self::visible_results).
    pub async fn sort_by(&mut self, key: &str) -> Result<()> {
        self.sorting.sort_results(key);
        if self.config.pagination {
            self.fetch().await
        } else {
            Ok(())
        }
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<()> {
        self.state.current_page = page.max(1);
        self.fetch().await
    }

    /// Issues a read request with the current filters, page, and sort. On
    /// failure the previously displayed rows stay put and the error is
    /// returned; retry is always a new user action.
    pub async fn fetch(&mut self) -> Result<()> {
        self.state.loading = true;
        let filters = self.filters.snapshot();
        let query = build_report_query(&ReportQueryParams {
            filters: &filters,
            page: self.config.pagination.then_some(self.state.current_page),
            sort: self.sorting.sort_params(),
        });
        let payload = match self.source.fetch_report(&self.config.source_url, &query).await {
            Ok(payload) => payload,
            Err(err) => {
                self.state.loading = false;
                tracing::error!("report fetch failed: {}", err);
                return Err(err);
            }
        };
        if let Err(err) = self.apply_payload(&payload) {
            self.state.loading = false;
            tracing::error!("report payload rejected: {}", err);
            return Err(err);
        }
        if let Some(hook) = &self.on_fetch_success {
            hook(&payload);
        }
        Ok(())
    }

    fn apply_payload(&mut self, payload: &Value) -> Result<()> {
        let rows_value = payload.get(&self.config.results_key).cloned().ok_or_else(|| {
            ReportError::Parse(format!(
                "payload is missing results key '{}'",
                self.config.results_key
            ))
        })?;
        let rows: Vec<R> = serde_json::from_value(rows_value)
            .map_err(|e| ReportError::Parse(format!("bad rows under '{}': {}", self.config.results_key, e)))?;

        self.state.results = rows;
        self.state.num_pages = payload
            .get("page_count")
            .and_then(Value::as_u64)
            .map(|n| n.max(1) as u32)
            .unwrap_or(1);
        if self.state.current_page > self.state.num_pages {
            self.state.current_page = self.state.num_pages;
        }
        self.state.teacher = payload.get("teacher").cloned().unwrap_or(Value::Null);
        for definition in &self.config.filters {
            let records = payload
                .get(&definition.source_key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let options =
                FilterStrategy::filter_options(&records, "name", "id", &definition.all_label);
            self.state
                .filter_option_sets
                .insert(definition.field.clone(), options);
        }
        self.state.loading = false;
        Ok(())
    }

    /// Rows in display order: server order for paginated reports, stable
    /// client-side sort over the held set otherwise. The table renderer is
    /// only shown when [`loading`](Self::loading) is false.
    pub fn visible_results(&self) -> Vec<R> {
        if self.config.pagination {
            self.state.results.clone()
        } else {
            self.sorting.apply_sorting(&self.state.results)
        }
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    pub fn current_page(&self) -> u32 {
        self.state.current_page
    }

    pub fn num_pages(&self) -> u32 {
        self.state.num_pages
    }

    pub fn max_page_number(&self) -> u32 {
        self.config.max_page_number
    }

    pub fn paginated(&self) -> bool {
        self.config.pagination
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.config.columns
    }

    /// Dropdown options for a filter field, derived from the last payload.
    pub fn filter_options(&self, field: &str) -> &[FilterOption] {
        self.state
            .filter_option_sets
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn active_filters(&self) -> BTreeMap<String, Value> {
        self.filters.snapshot()
    }

    pub fn active_sort(&self) -> Option<&ActiveSort> {
        self.sorting.active_sort()
    }

    /// Teacher object from the last payload, consumed by the export
    /// confirmation surface.
    pub fn teacher(&self) -> &Value {
        &self.state.teacher
    }

    /// Snapshot for the export flow, when this report offers a CSV export:
    /// the configured export type plus the filters active right now.
    pub fn export_request(&self) -> Option<ExportRequest> {
        self.config
            .export_csv
            .as_ref()
            .map(|export_type| ExportRequest::new(export_type.clone(), self.filters.snapshot()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct ConceptRow {
        concept: String,
        score: i64,
    }

    /// Records every query it receives and replays canned responses.
    struct MockSource {
        queries: Mutex<Vec<Vec<(String, String)>>>,
        responses: Mutex<Vec<Result<Value>>>,
    }

    impl MockSource {
        fn with_payload(payload: Value) -> Arc<Self> {
            Arc::new(Self {
                queries: Mutex::new(Vec::new()),
                responses: Mutex::new(vec![Ok(payload)]),
            })
        }

        fn with_responses(responses: Vec<Result<Value>>) -> Arc<Self> {
            Arc::new(Self {
                queries: Mutex::new(Vec::new()),
                responses: Mutex::new(responses),
            })
        }

        fn query_count(&self) -> usize {
            self.queries.lock().unwrap().len()
        }

        fn last_query(&self) -> Vec<(String, String)> {
            self.queries.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl ReportSource for MockSource {
        async fn fetch_report(&self, _url: &str, query: &[(String, String)]) -> Result<Value> {
            self.queries.lock().unwrap().push(query.to_vec());
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.remove(0)
            } else {
                // keep replaying the final response
                match &responses[0] {
                    Ok(payload) => Ok(payload.clone()),
                    Err(_) => Err(ReportError::Fetch("mock failure".to_string())),
                }
            }
        }
    }

    fn payload() -> Value {
        json!({
            "concepts": [
                {"concept": "Commas", "score": 72},
                {"concept": "Capitalization", "score": 95}
            ],
            "page_count": 3,
            "teacher": {"email": "teacher@example.com"},
            "classrooms": [{"id": 1, "name": "Period 1"}],
            "students": [{"id": 10, "name": "Ada"}],
            "units": [{"id": 20, "name": "Unit A"}]
        })
    }

    fn config(pagination: bool) -> ReportConfig {
        serde_json::from_value(json!({
            "source_url": "/teachers/progress_reports/concepts",
            "results_key": "concepts",
            "columns": [
                {"name": "Concept", "field": "concept", "sort_field": "concept"},
                {"name": "Score", "field": "score", "sort_field": "score"}
            ],
            "filters": [
                {"field": "classroom_id", "source_key": "classrooms", "all_label": "All Classrooms"},
                {"field": "student_id", "source_key": "students", "all_label": "All Students"},
                {"field": "unit_id", "source_key": "units", "all_label": "All Units"}
            ],
            "pagination": pagination,
            "export_csv": "concept_mastery"
        }))
        .unwrap()
    }

    fn sort_config() -> SortConfig<ConceptRow> {
        SortConfig::new("score").client("score", |a: &ConceptRow, b: &ConceptRow| {
            a.score.cmp(&b.score)
        })
    }

    #[tokio::test]
    async fn test_mount_fetches_and_populates_state() {
        let source = MockSource::with_payload(payload());
        let mut controller = ReportDataController::new(config(true), sort_config(), source.clone());
        controller.mount().await.unwrap();

        assert_eq!(source.query_count(), 1);
        assert!(!controller.loading());
        assert_eq!(controller.num_pages(), 3);
        assert_eq!(controller.visible_results().len(), 2);
        assert_eq!(controller.teacher()["email"], json!("teacher@example.com"));

        let classrooms = controller.filter_options("classroom_id");
        assert_eq!(classrooms[0].name, "All Classrooms");
        assert_eq!(classrooms[1].name, "Period 1");
        assert_eq!(classrooms[1].value, json!(1));
        assert_eq!(controller.filter_options("student_id").len(), 2);
        assert_eq!(controller.filter_options("unit_id").len(), 2);
    }

    #[tokio::test]
    async fn test_mount_fails_fast_on_unknown_default_sort_key() {
        let source = MockSource::with_payload(payload());
        let bad_sort: SortConfig<ConceptRow> = SortConfig::new("missing")
            .client("score", |a: &ConceptRow, b: &ConceptRow| a.score.cmp(&b.score));
        let mut controller = ReportDataController::new(config(true), bad_sort, source.clone());
        assert!(matches!(
            controller.mount().await,
            Err(ReportError::Config(_))
        ));
        assert_eq!(source.query_count(), 0);
    }

    #[tokio::test]
    async fn test_filter_change_resets_page_before_fetch_when_paginated() {
        let source = MockSource::with_payload(payload());
        let mut controller = ReportDataController::new(config(true), sort_config(), source.clone());
        controller.mount().await.unwrap();
        controller.go_to_page(3).await.unwrap();
        assert_eq!(controller.current_page(), 3);

        controller.select_filter("classroom_id", json!(5)).await.unwrap();

        let query = source.last_query();
        assert!(query.contains(&("page".to_string(), "1".to_string())));
        assert!(query.contains(&("classroom_id".to_string(), "5".to_string())));
        assert_eq!(controller.current_page(), 1);
    }

    #[tokio::test]
    async fn test_filter_change_fetches_without_page_when_unpaginated() {
        let source = MockSource::with_payload(payload());
        let mut controller =
            ReportDataController::new(config(false), sort_config(), source.clone());
        controller.mount().await.unwrap();

        controller.select_filter("unit_id", json!(20)).await.unwrap();

        assert_eq!(source.query_count(), 2);
        assert!(source.last_query().iter().all(|(k, _)| k != "page"));
    }

    #[tokio::test]
    async fn test_sort_change_refetches_only_when_paginated() {
        let source = MockSource::with_payload(payload());
        let mut controller = ReportDataController::new(config(true), sort_config(), source.clone());
        controller.mount().await.unwrap();
        controller.sort_by("score").await.unwrap();
        assert_eq!(source.query_count(), 2);
        assert!(source
            .last_query()
            .contains(&("direction".to_string(), "desc".to_string())));

        let source = MockSource::with_payload(payload());
        let mut controller =
            ReportDataController::new(config(false), sort_config(), source.clone());
        controller.mount().await.unwrap();
        controller.sort_by("score").await.unwrap();
        // no network traffic beyond mount; rows re-sort locally
        assert_eq!(source.query_count(), 1);
        let rows = controller.visible_results();
        assert_eq!(rows[0].score, 95);
        assert_eq!(rows[1].score, 72);
    }

    #[tokio::test]
    async fn test_unpaginated_default_sort_orders_visible_results() {
        let source = MockSource::with_payload(payload());
        let mut controller =
            ReportDataController::new(config(false), sort_config(), source.clone());
        controller.mount().await.unwrap();
        let rows = controller.visible_results();
        assert_eq!(rows[0].score, 72);
        assert_eq!(rows[1].score, 95);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_stale_results_and_clears_loading() {
        let source = MockSource::with_responses(vec![
            Ok(payload()),
            Err(ReportError::Fetch("boom".to_string())),
        ]);
        let mut controller = ReportDataController::new(config(true), sort_config(), source.clone());
        controller.mount().await.unwrap();
        let before = controller.visible_results();

        let outcome = controller.go_to_page(2).await;

        assert!(matches!(outcome, Err(ReportError::Fetch(_))));
        assert!(!controller.loading());
        assert_eq!(controller.visible_results(), before);
    }

    #[tokio::test]
    async fn test_bad_payload_keeps_stale_results() {
        let source = MockSource::with_responses(vec![
            Ok(payload()),
            Ok(json!({"page_count": 1})),
        ]);
        let mut controller = ReportDataController::new(config(true), sort_config(), source.clone());
        controller.mount().await.unwrap();

        let outcome = controller.fetch().await;

        assert!(matches!(outcome, Err(ReportError::Parse(_))));
        assert!(!controller.loading());
        assert_eq!(controller.visible_results().len(), 2);
    }

    #[tokio::test]
    async fn test_current_page_clamped_to_shrunken_page_count() {
        let mut shrunk = payload();
        shrunk["page_count"] = json!(2);
        let source = MockSource::with_responses(vec![Ok(payload()), Ok(shrunk)]);
        let mut controller = ReportDataController::new(config(true), sort_config(), source.clone());
        controller.mount().await.unwrap();

        controller.go_to_page(5).await.unwrap();

        assert_eq!(controller.current_page(), 2);
    }

    #[tokio::test]
    async fn test_fetch_hook_receives_raw_payload() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let source = MockSource::with_payload(payload());
        let mut controller = ReportDataController::new(config(true), sort_config(), source)
            .with_fetch_hook(move |payload| {
                assert_eq!(payload["page_count"], json!(3));
                seen.fetch_add(1, AtomicOrdering::SeqCst);
            });
        controller.mount().await.unwrap();
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_export_request_snapshots_current_filters() {
        let source = MockSource::with_payload(payload());
        let mut controller = ReportDataController::new(config(true), sort_config(), source);
        controller.mount().await.unwrap();
        controller.select_filter("classroom_id", json!(5)).await.unwrap();

        let request = controller.export_request().unwrap();
        assert_eq!(request.export_type, "concept_mastery");
        assert_eq!(request.filters.get("classroom_id"), Some(&json!(5)));
    }
}
