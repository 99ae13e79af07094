//! Decoded query-string parameters.

use std::collections::BTreeMap;

use crate::error::RqlResult;
use crate::parser;

/// Decoded query-string parameters.
///
/// Keys iterate in lexicographic order, so everything compiled from them is
/// stable across runs. Repeated keys keep all of their values in arrival
/// order; scalar lookups only consult the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    inner: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw query string. See [`parser::parse_query_string`].
    pub fn parse(query: &str) -> RqlResult<Self> {
        parser::parse_query_string(query)
    }

    /// Append a value under `key`, keeping earlier values.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Replace every value under `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// Builder-style [`QueryParams::append`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Vec<String>> {
        self.inner.get(key)
    }

    /// First value of `key`, if the key is present.
    ///
    /// A key present with no values reads as the empty string.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .map(|values| values.first().map(String::as_str).unwrap_or_default())
    }

    /// First value of `key`, or `default` when the key is absent.
    pub fn first_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.first(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.append(k, v);
        }
        params
    }
}
