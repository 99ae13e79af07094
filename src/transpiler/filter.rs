//! `filters[<field>:<op>]=<value>` → `alias.field <op> $n`.

use crate::ast::{Condition, Operator, Value};
use crate::config::FilterPolicy;
use crate::error::{RqlError, RqlResult};
use crate::guard::qualify;
use crate::params::QueryParams;
use crate::parser::{KeyKind, classify_key};
use crate::report::{Clause, Dropped};

use super::Scope;

/// Compile every filter key, in key order, binding values into `args`.
///
/// Under [`FilterPolicy::Permissive`] malformed keys and disallowed fields are
/// dropped and unknown operators become `=`. Under [`FilterPolicy::Strict`]
/// each of those rejects the request.
pub fn compile_filters(
    params: &QueryParams,
    scope: &Scope<'_>,
    args: &mut Vec<Value>,
) -> RqlResult<Vec<Condition>> {
    let strict = scope.config.filter_policy == FilterPolicy::Strict;
    let mut conditions = Vec::new();

    for (key, values) in params.iter() {
        let filter = match classify_key(key) {
            KeyKind::Other => continue,
            KeyKind::Malformed => {
                if strict {
                    return Err(RqlError::rejected(key, "expected filters[<field>:<op>]"));
                }
                scope.report(Dropped::MalformedFilter {
                    key: key.to_string(),
                });
                continue;
            }
            KeyKind::Filter(filter) => filter,
        };

        if !scope.allow.is_allowed(filter.field) {
            if strict {
                return Err(RqlError::rejected(key, "field is not filterable"));
            }
            scope.report(Dropped::DisallowedField {
                clause: Clause::Filter,
                field: filter.field.to_string(),
            });
            continue;
        }

        let op = match Operator::from_symbol(filter.op) {
            Some(op) => op,
            None if strict => {
                return Err(RqlError::rejected(
                    key,
                    format!("unknown operator '{}'", filter.op),
                ));
            }
            None => {
                scope.report(Dropped::UnknownOperator {
                    key: key.to_string(),
                    op: filter.op.to_string(),
                });
                Operator::Eq
            }
        };

        let raw = values.first().map(String::as_str).unwrap_or_default();
        args.push(Value::infer(raw));
        conditions.push(Condition::Compare {
            column: qualify(filter.field, scope.alias),
            op,
            param: args.len(),
        });
    }

    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::guard::AllowList;
    use crate::report::CollectingReporter;
    use crate::transpiler::{ToSql, join_conditions};
    use pretty_assertions::assert_eq;

    fn allow() -> AllowList {
        ["group_id", "category", "name", "activated", "confirmation_date"]
            .into_iter()
            .collect()
    }

    fn params() -> QueryParams {
        [
            ("q", ""),
            ("sort", "name,category"),
            ("fields", "name"),
            ("filters[activated:eq]", "true"),
            ("filters[category:eq]", "RG"),
            ("filters[group_id:eq]", "66"),
            ("filters[confirmation_date:lt]", "2019-03-05"),
            ("filters[group_id:lte]", "55"),
            ("filters[confirmation_date:gte]", "2019-03-04"),
            ("filters[group_id:gt]", "77"),
            ("filters[group_id:neq]", "77"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_filters_in_key_order() {
        let allow = allow();
        let config = CompilerConfig::default();
        let reporter = CollectingReporter::new();
        let scope = Scope::new("g", &allow, &config, &reporter);
        let mut args = Vec::new();

        let conditions = compile_filters(&params(), &scope, &mut args).unwrap();
        assert_eq!(
            join_conditions(&conditions, " AND "),
            "g.activated = $1 AND g.category = $2 AND g.confirmation_date >= $3 \
             AND g.confirmation_date < $4 AND g.group_id = $5 AND g.group_id > $6 \
             AND g.group_id <= $7 AND g.group_id <> $8"
        );
        assert_eq!(
            args,
            vec![
                Value::Bool(true),
                Value::from("RG"),
                Value::from("2019-03-04"),
                Value::from("2019-03-05"),
                Value::Int(66),
                Value::Int(77),
                Value::Int(55),
                Value::Int(77),
            ]
        );
        assert!(reporter.take().is_empty());
    }

    #[test]
    fn test_gt_binds_integer() {
        let allow = allow();
        let config = CompilerConfig::default();
        let reporter = CollectingReporter::new();
        let scope = Scope::new("g", &allow, &config, &reporter);
        let params = QueryParams::new().with("filters[group_id:gt]", "77");
        let mut args = Vec::new();

        let conditions = compile_filters(&params, &scope, &mut args).unwrap();
        assert_eq!(conditions[0].to_sql(), "g.group_id > $1");
        assert_eq!(args, vec![Value::Int(77)]);
    }

    #[test]
    fn test_numbering_continues_after_existing_args() {
        let allow = allow();
        let config = CompilerConfig::default();
        let reporter = CollectingReporter::new();
        let scope = Scope::new("", &allow, &config, &reporter);
        let params = QueryParams::new().with("filters[name:like]", "a%");
        let mut args = vec![Value::from("search")];

        let conditions = compile_filters(&params, &scope, &mut args).unwrap();
        assert_eq!(conditions[0].to_sql(), "name LIKE $2");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_permissive_drops_and_reports() {
        let allow = allow();
        let config = CompilerConfig::default();
        let reporter = CollectingReporter::new();
        let scope = Scope::new("g", &allow, &config, &reporter);
        let params = QueryParams::new()
            .with("filters[password:eq]", "hunter2")
            .with("filters[name]", "x")
            .with("filters[name:between]", "x")
            .with("filters[category:eq]", "RG");
        let mut args = Vec::new();

        let conditions = compile_filters(&params, &scope, &mut args).unwrap();
        assert_eq!(
            join_conditions(&conditions, " AND "),
            "g.category = $1 AND g.name = $2"
        );
        assert_eq!(args, vec![Value::from("RG"), Value::from("x")]);
        assert_eq!(
            reporter.take(),
            vec![
                Dropped::UnknownOperator {
                    key: "filters[name:between]".into(),
                    op: "between".into()
                },
                Dropped::MalformedFilter {
                    key: "filters[name]".into()
                },
                Dropped::DisallowedField {
                    clause: Clause::Filter,
                    field: "password".into()
                },
            ]
        );
    }

    #[test]
    fn test_strict_rejects_disallowed_field() {
        let allow = allow();
        let config = CompilerConfig::builder().strict().build().unwrap();
        let reporter = CollectingReporter::new();
        let scope = Scope::new("g", &allow, &config, &reporter);
        let params = QueryParams::new().with("filters[password:eq]", "x");

        let err = compile_filters(&params, &scope, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, RqlError::RejectedFilter { .. }));
    }

    #[test]
    fn test_strict_rejects_unknown_operator() {
        let allow = allow();
        let config = CompilerConfig::builder().strict().build().unwrap();
        let reporter = CollectingReporter::new();
        let scope = Scope::new("g", &allow, &config, &reporter);
        let params = QueryParams::new().with("filters[name:between]", "x");

        let err = compile_filters(&params, &scope, &mut Vec::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Rejected filter 'filters[name:between]': unknown operator 'between'"
        );
    }

    #[test]
    fn test_strict_rejects_malformed_key() {
        let allow = allow();
        let config = CompilerConfig::builder().strict().build().unwrap();
        let reporter = CollectingReporter::new();
        let scope = Scope::new("g", &allow, &config, &reporter);
        let params = QueryParams::new().with("filters[name]", "x");

        assert!(compile_filters(&params, &scope, &mut Vec::new()).is_err());
    }
}
