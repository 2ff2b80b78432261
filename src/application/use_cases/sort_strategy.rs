use crate::domain::error::{ReportError, Result};
use crate::domain::sort_config::{ActiveSort, SortConfig, SortDirection, SortRule};

/// Holds the active sort key/direction for a declarative sort configuration.
/// One strategy serves both paginated and unpaginated reports; the
/// controller decides whether a sort change refetches or only re-sorts.
pub struct SortStrategy<R> {
    config: Option<SortConfig<R>>,
    active: Option<ActiveSort>,
}

impl<R> Default for SortStrategy<R> {
    fn default() -> Self {
        Self {
            config: None,
            active: None,
        }
    }
}

impl<R: Clone> SortStrategy<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the sort configuration and activates its default key,
    /// ascending. A default key absent from the rule map is a programmer
    /// error and fails here rather than at first use.
    pub fn define_sorting(&mut self, config: SortConfig<R>) -> Result<()> {
        if !config.rules.contains_key(&config.default_key) {
            return Err(ReportError::Config(format!(
                "default sort key '{}' is not in the sort config",
                config.default_key
            )));
        }
        self.active = Some(ActiveSort {
            key: config.default_key.clone(),
            direction: SortDirection::Ascending,
        });
        self.config = Some(config);
        Ok(())
    }

    pub fn active_sort(&self) -> Option<&ActiveSort> {
        self.active.as_ref()
    }

    /// Toggles direction when `key` is already active, otherwise activates
    /// `key` ascending. The caller runs its after-sort step (refetch or
    /// nothing) immediately after this returns.
    pub fn sort_results(&mut self, key: &str) {
        match self.active.as_mut() {
            Some(active) if active.key == key => {
                active.direction = active.direction.toggled();
            }
            _ => {
                self.active = Some(ActiveSort {
                    key: key.to_string(),
                    direction: SortDirection::Ascending,
                });
            }
        }
    }

    /// Stable sort over a copy of `rows` when the active key names a
    /// client-side comparator; rows pass through unchanged for
    /// server-delegated keys (the server already ordered them) or when no
    /// sorting is registered.
    pub fn apply_sorting(&self, rows: &[R]) -> Vec<R> {
        let mut sorted: Vec<R> = rows.to_vec();
        let (Some(config), Some(active)) = (self.config.as_ref(), self.active.as_ref()) else {
            return sorted;
        };
        if let Some(SortRule::Comparator(compare)) = config.rules.get(&active.key) {
            match active.direction {
                SortDirection::Ascending => sorted.sort_by(|a, b| compare(a, b)),
                SortDirection::Descending => sorted.sort_by(|a, b| compare(a, b).reverse()),
            }
        }
        sorted
    }

    /// The (`sort`, `direction`) pair for the request query string: the
    /// configured token for server-delegated keys, the key itself otherwise.
    pub fn sort_params(&self) -> Option<(String, SortDirection)> {
        let active = self.active.as_ref()?;
        let token = match self
            .config
            .as_ref()
            .and_then(|config| config.rules.get(&active.key))
        {
            Some(SortRule::ServerToken(token)) => token.clone(),
            _ => active.key.clone(),
        };
        Some((token, active.direction))
    }
}
