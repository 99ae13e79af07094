//! Per-request compiler input.

use crate::error::RqlResult;
use crate::guard::{AllowList, Model};
use crate::params::QueryParams;

/// Everything needed to compile one paginated query.
///
/// Built once per inbound request and consumed by
/// [`Compiler::compile`](crate::Compiler::compile).
#[derive(Debug, Clone, Default)]
pub struct PaginationRequest {
    /// A complete `SELECT` statement.
    pub base_query: String,
    pub params: QueryParams,
    pub allowed_fields: AllowList,
    /// Sort list used when `sort` is absent, e.g. `"-created_at"`.
    pub default_sort: String,
    /// Trusted predicate ANDed ahead of everything compiled from `params`.
    pub pre_filter: Option<String>,
    pub alias: String,
}

impl PaginationRequest {
    pub fn builder() -> PaginationRequestBuilder {
        PaginationRequestBuilder::default()
    }
}

/// Builder for PaginationRequest
#[derive(Debug, Default)]
pub struct PaginationRequestBuilder {
    request: PaginationRequest,
    raw_query: Option<String>,
}

impl PaginationRequestBuilder {
    pub fn base_query(mut self, sql: impl Into<String>) -> Self {
        self.request.base_query = sql.into();
        self
    }

    /// Use already-decoded parameters.
    pub fn params(mut self, params: QueryParams) -> Self {
        self.request.params = params;
        self
    }

    /// Decode parameters from a raw query string when building.
    ///
    /// Decoded pairs are appended after any set through [`Self::params`].
    pub fn query_string(mut self, raw: impl Into<String>) -> Self {
        self.raw_query = Some(raw.into());
        self
    }

    pub fn allow<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.allowed_fields.extend(fields);
        self
    }

    /// Allow the filterable columns of `M`.
    pub fn model<M: Model>(mut self) -> Self {
        self.request
            .allowed_fields
            .extend(M::filterable().iter().copied());
        self
    }

    pub fn default_sort(mut self, sort: impl Into<String>) -> Self {
        self.request.default_sort = sort.into();
        self
    }

    pub fn pre_filter(mut self, predicate: impl Into<String>) -> Self {
        self.request.pre_filter = Some(predicate.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.request.alias = alias.into();
        self
    }

    /// Build the request, decoding the raw query string if one was given.
    pub fn build(self) -> RqlResult<PaginationRequest> {
        let mut request = self.request;
        if let Some(raw) = self.raw_query {
            for (key, values) in QueryParams::parse(&raw)?.iter() {
                for value in values {
                    request.params.append(key, value.as_str());
                }
            }
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RqlError;

    struct Group;

    impl Model for Group {
        fn filterable() -> &'static [&'static str] {
            &["category", "name"]
        }
    }

    #[test]
    fn test_builder_decodes_query_string() {
        let request = PaginationRequest::builder()
            .base_query("SELECT * FROM groups")
            .query_string("?filters%5Bname%3Aeq%5D=x&page%5Bsize%5D=5")
            .alias("g")
            .build()
            .unwrap();
        assert_eq!(request.params.first("filters[name:eq]"), Some("x"));
        assert_eq!(request.params.first("page[size]"), Some("5"));
        assert_eq!(request.alias, "g");
    }

    #[test]
    fn test_builder_propagates_structural_error() {
        let err = PaginationRequest::builder()
            .query_string("q=%zz")
            .build()
            .unwrap_err();
        assert!(matches!(err, RqlError::Parse { .. }));
    }

    #[test]
    fn test_builder_model_and_allow() {
        let request = PaginationRequest::builder()
            .model::<Group>()
            .allow(["group_id"])
            .build()
            .unwrap();
        assert!(request.allowed_fields.is_allowed("name"));
        assert!(request.allowed_fields.is_allowed("group_id"));
        assert!(!request.allowed_fields.is_allowed("description"));
    }
}
