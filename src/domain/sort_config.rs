use std::cmp::Ordering;
use std::collections::BTreeMap;

pub type Comparator<R> = Box<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

/// How a sort key orders rows: either a client-side comparator, or a token
/// the server understands (the server returns rows already ordered).
pub enum SortRule<R> {
    Comparator(Comparator<R>),
    ServerToken(String),
}

impl<R> std::fmt::Debug for SortRule<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortRule::Comparator(_) => write!(f, "SortRule::Comparator"),
            SortRule::ServerToken(token) => write!(f, "SortRule::ServerToken({})", token),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSort {
    pub key: String,
    pub direction: SortDirection,
}

/// Declarative sort configuration, registered once at mount.
pub struct SortConfig<R> {
    pub rules: BTreeMap<String, SortRule<R>>,
    pub default_key: String,
}

impl<R> SortConfig<R> {
    pub fn new(default_key: impl Into<String>) -> Self {
        Self {
            rules: BTreeMap::new(),
            default_key: default_key.into(),
        }
    }

    /// Adds a client-side comparator for `key`.
    pub fn client(
        mut self,
        key: impl Into<String>,
        compare: impl Fn(&R, &R) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.rules
            .insert(key.into(), SortRule::Comparator(Box::new(compare)));
        self
    }

    /// Adds a server-delegated sort: `token` is sent as the sort parameter
    /// and rows come back already ordered.
    pub fn server(mut self, key: impl Into<String>, token: impl Into<String>) -> Self {
        self.rules
            .insert(key.into(), SortRule::ServerToken(token.into()));
        self
    }
}

impl<R> std::fmt::Debug for SortConfig<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortConfig")
            .field("rules", &self.rules)
            .field("default_key", &self.default_key)
            .finish()
    }
}
