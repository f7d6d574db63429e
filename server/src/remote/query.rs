//! Row filter builder rendered as REST query parameters.
//!
//! `Query::select("user_nickname").eq("user_nickname", "leaf").neq("user_id", id).limit(1)`
//! renders to `select=user_nickname&user_nickname=eq.leaf&user_id=neq.<id>&limit=1`.

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq { column: String, value: String },
    Neq { column: String, value: String },
}

impl Filter {
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Eq { column, .. } | Self::Neq { column, .. } => column,
        }
    }

    /// Whether a row's rendered column value passes this filter.
    #[must_use]
    pub fn matches(&self, actual: Option<&str>) -> bool {
        match self {
            Self::Eq { value, .. } => actual == Some(value.as_str()),
            Self::Neq { value, .. } => actual.is_some_and(|a| a != value),
        }
    }

    fn param(&self) -> (String, String) {
        match self {
            Self::Eq { column, value } => (column.clone(), format!("eq.{value}")),
            Self::Neq { column, value } => (column.clone(), format!("neq.{value}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    columns: String,
    filters: Vec<Filter>,
    limit: Option<usize>,
}

impl Query {
    /// Start a query returning `columns` (`*`, a column list, or embeds like `*, posts(*)`).
    #[must_use]
    pub fn select(columns: &str) -> Self {
        Self { columns: columns.to_owned(), filters: Vec::new(), limit: None }
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq { column: column.to_owned(), value: value.into() });
        self
    }

    #[must_use]
    pub fn neq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Neq { column: column.to_owned(), value: value.into() });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn columns(&self) -> &str {
        &self.columns
    }

    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    #[must_use]
    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    /// Render as ordered `(key, value)` pairs; the HTTP client percent-encodes.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 2);
        params.push(("select".to_owned(), self.columns.replace(' ', "")));
        params.extend(self.filters.iter().map(Filter::param));
        if let Some(limit) = self.limit {
            params.push(("limit".to_owned(), limit.to_string()));
        }
        params
    }
}
