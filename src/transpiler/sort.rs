//! `sort=name,-created_at` → `alias.name ASC, alias.created_at DESC`.

use crate::ast::{SortField, SortOrder};
use crate::guard::qualify;
use crate::params::QueryParams;
use crate::report::{Clause, Dropped};

use super::Scope;

/// Split one sort entry into its bare field and direction.
pub fn parse_sort_entry(entry: &str) -> (&str, SortOrder) {
    match entry.strip_prefix('-') {
        Some(field) => (field, SortOrder::Desc),
        None => (entry, SortOrder::Asc),
    }
}

/// Compile `sort`, or `default_sort` when the parameter is absent.
///
/// Entries keep the caller's order.
pub fn compile_sort(params: &QueryParams, default_sort: &str, scope: &Scope<'_>) -> Vec<SortField> {
    let list = params.first_or("sort", default_sort);

    let mut fields = Vec::new();
    for entry in list.split(',') {
        let (field, order) = parse_sort_entry(entry);
        if !scope.allow.is_allowed(field) {
            if !field.is_empty() {
                scope.report(Dropped::DisallowedField {
                    clause: Clause::Sort,
                    field: field.to_string(),
                });
            }
            continue;
        }
        fields.push(SortField {
            column: qualify(field, scope.alias),
            order,
        });
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::guard::AllowList;
    use crate::report::CollectingReporter;
    use crate::transpiler::order_by;

    fn allow() -> AllowList {
        ["name", "category", "created_at"].into_iter().collect()
    }

    #[test]
    fn test_mixed_directions_keep_order() {
        let allow = allow();
        let config = CompilerConfig::default();
        let reporter = CollectingReporter::new();
        let scope = Scope::new("g", &allow, &config, &reporter);
        let params = QueryParams::new().with("sort", "name,-category");

        let fields = compile_sort(&params, "", &scope);
        assert_eq!(
            order_by(&fields).unwrap(),
            "g.name ASC, g.category DESC"
        );
    }

    #[test]
    fn test_default_sort_when_absent() {
        let allow = allow();
        let config = CompilerConfig::default();
        let reporter = CollectingReporter::new();
        let scope = Scope::new("g", &allow, &config, &reporter);

        let fields = compile_sort(&QueryParams::new(), "-created_at", &scope);
        assert_eq!(order_by(&fields).unwrap(), "g.created_at DESC");
    }

    #[test]
    fn test_present_but_empty_sort_disables_default() {
        let allow = allow();
        let config = CompilerConfig::default();
        let reporter = CollectingReporter::new();
        let scope = Scope::new("g", &allow, &config, &reporter);
        let params = QueryParams::new().with("sort", "");

        assert!(compile_sort(&params, "name", &scope).is_empty());
        assert!(reporter.take().is_empty());
    }

    #[test]
    fn test_disallowed_entries_skipped() {
        let allow = allow();
        let config = CompilerConfig::default();
        let reporter = CollectingReporter::new();
        let scope = Scope::new("", &allow, &config, &reporter);
        let params = QueryParams::new().with("sort", "-password,name,--name");

        let fields = compile_sort(&params, "", &scope);
        assert_eq!(order_by(&fields).unwrap(), "name ASC");
        assert_eq!(reporter.take().len(), 2);
    }

    #[test]
    fn test_parse_sort_entry() {
        assert_eq!(parse_sort_entry("-name"), ("name", SortOrder::Desc));
        assert_eq!(parse_sort_entry("name"), ("name", SortOrder::Asc));
    }
}
