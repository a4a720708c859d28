//! Query parameter types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A query parameter whose value may be absent.
///
/// Absent values are dropped when the query string is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// The parameter key
    pub key: String,
    /// The parameter value, `None` when the caller had nothing to send
    pub value: Option<String>,
}

impl QueryParam {
    /// Creates a query parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: Option<impl ToString>) -> Self {
        Self {
            key: key.into(),
            value: value.map(|v| v.to_string()),
        }
    }
}

/// An ordered collection of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    items: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty query parameter collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds a parameter with a present value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.items.push(QueryParam::new(key, Some(value)));
        self
    }

    /// Adds a parameter whose value may be absent.
    #[must_use]
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        self.items.push(QueryParam::new(key, value));
        self
    }

    /// Returns an iterator over parameters that carry a value.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items
            .iter()
            .filter_map(|p| p.value.as_deref().map(|v| (p.key.as_str(), v)))
    }

    /// Renders the URL-encoded query string without the leading `?`.
    ///
    /// Returns an empty string when no parameter carries a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the pairs cannot be URL-encoded.
    pub fn to_query_string(&self) -> DomainResult<String> {
        let pairs: Vec<(&str, &str)> = self.present().collect();
        serde_urlencoded::to_string(pairs).map_err(|e| DomainError::InvalidQuery(e.to_string()))
    }

    /// Returns the number of parameters, including absent ones.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<QueryParam> for QueryParams {
    fn from_iter<T: IntoIterator<Item = QueryParam>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
