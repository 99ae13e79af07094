//! `fields=a,b&q=term` → `(alias.a iLIKE '%' || $n || '%' OR ...)`.

use crate::ast::{Condition, Value};
use crate::guard::qualify;
use crate::params::QueryParams;
use crate::report::{Clause, Dropped};

use super::Scope;

/// Compile the free-text search group.
///
/// `q` is bound once per matched field, so each condition has its own
/// placeholder. A missing `q` searches for the empty string.
pub fn compile_search(
    params: &QueryParams,
    scope: &Scope<'_>,
    args: &mut Vec<Value>,
) -> Vec<Condition> {
    let Some(fields) = params.first("fields") else {
        return Vec::new();
    };
    let term = params.first("q").unwrap_or_default();

    let mut conditions = Vec::new();
    for field in fields.split(',') {
        if !scope.allow.is_allowed(field) {
            if !field.is_empty() {
                scope.report(Dropped::DisallowedField {
                    clause: Clause::Search,
                    field: field.to_string(),
                });
            }
            continue;
        }
        args.push(Value::String(term.to_string()));
        conditions.push(Condition::Contains {
            column: qualify(field, scope.alias),
            param: args.len(),
        });
    }
    conditions
}
