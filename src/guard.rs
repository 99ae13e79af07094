//! Field allow-list.
//!
//! Every column name that reaches compiled SQL passes through here first.

use std::collections::BTreeSet;

/// Columns a request may filter, search or sort on.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    fields: BTreeSet<String>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>) {
        self.fields.insert(field.into());
    }

    pub fn is_allowed(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for AllowList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.fields.extend(iter.into_iter().map(Into::into));
    }
}

/// A row type that declares which of its columns are filterable.
///
/// ```
/// use rql::guard::{AllowList, Model};
///
/// struct Group;
///
/// impl Model for Group {
///     fn filterable() -> &'static [&'static str] {
///         &["group_id", "category", "name", "activated"]
///     }
/// }
///
/// let allow = AllowList::of::<Group>();
/// assert!(allow.is_allowed("category"));
/// assert!(!allow.is_allowed("description"));
/// ```
pub trait Model {
    fn filterable() -> &'static [&'static str];
}

impl AllowList {
    /// Allow-list built from a model's filterable columns.
    pub fn of<M: Model>() -> Self {
        M::filterable().iter().copied().collect()
    }
}

/// Qualify a column with the query alias: `alias.field`, or `field` when the
/// alias is empty.
pub fn qualify(field: &str, alias: &str) -> String {
    if alias.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", alias, field)
    }
}
