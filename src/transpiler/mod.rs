//! Statement assembly.
//!
//! Stages, in order: shell, WHERE (pre-filter, search group, filters),
//! ORDER BY, LIMIT/OFFSET. Placeholders are numbered in the order values are
//! bound: search fields first, then filters in key order.

pub mod filter;
pub mod page;
pub mod search;
pub mod sort;

use crate::ast::{Condition, SortField, Value};
use crate::config::{CompilerConfig, Shell};
use crate::error::RqlResult;
use crate::guard::AllowList;
use crate::report::{Dropped, Reporter};
use crate::request::PaginationRequest;
use crate::statement::CompiledStatement;

pub use page::PagePlan;

/// Subquery alias used when the request names none; PostgreSQL before 16
/// requires one on every derived table.
pub const DEFAULT_SHELL_ALIAS: &str = "tb_base";

/// Trait for converting compiled fragments to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string.
    fn to_sql(&self) -> String;
}

impl ToSql for Condition {
    fn to_sql(&self) -> String {
        match self {
            Condition::Compare { column, op, param } => {
                format!("{} {} ${}", column, op.sql(), param)
            }
            Condition::Contains { column, param } => {
                format!("{} iLIKE '%' || ${} || '%'", column, param)
            }
        }
    }
}

impl ToSql for SortField {
    fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.order)
    }
}

/// What every stage compiles against.
pub struct Scope<'a> {
    pub alias: &'a str,
    pub allow: &'a AllowList,
    pub config: &'a CompilerConfig,
    pub reporter: &'a dyn Reporter,
}

impl<'a> Scope<'a> {
    pub fn new(
        alias: &'a str,
        allow: &'a AllowList,
        config: &'a CompilerConfig,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            alias,
            allow,
            config,
            reporter,
        }
    }

    pub(crate) fn report(&self, item: Dropped) {
        self.reporter.report(&item);
    }
}

pub(crate) fn join_conditions(conditions: &[Condition], joiner: &str) -> String {
    conditions
        .iter()
        .map(ToSql::to_sql)
        .collect::<Vec<_>>()
        .join(joiner)
}

/// `OR` group of search conditions; parenthesized when it has more than one.
pub(crate) fn search_group(conditions: &[Condition]) -> Option<String> {
    match conditions.len() {
        0 => None,
        1 => Some(conditions[0].to_sql()),
        _ => Some(format!("({})", join_conditions(conditions, " OR "))),
    }
}

pub(crate) fn order_by(fields: &[SortField]) -> Option<String> {
    if fields.is_empty() {
        return None;
    }
    Some(
        fields
            .iter()
            .map(ToSql::to_sql)
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// A request compiled into its named stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// The base query, wrapped or verbatim.
    pub shell: String,
    pub pre_filter: Option<String>,
    pub search: Vec<Condition>,
    pub filters: Vec<Condition>,
    pub sort: Vec<SortField>,
    pub page: PagePlan,
    pub args: Vec<Value>,
    count_alias: String,
}

impl Plan {
    /// Compile every stage of `request`.
    pub fn build(request: &PaginationRequest, scope: &Scope<'_>) -> RqlResult<Self> {
        let shell = match scope.config.shell {
            Shell::Subquery if scope.alias.is_empty() => {
                format!("SELECT * FROM ({}) AS {}", request.base_query, DEFAULT_SHELL_ALIAS)
            }
            Shell::Subquery => format!("SELECT * FROM ({}) AS {}", request.base_query, scope.alias),
            Shell::Inline => request.base_query.clone(),
        };

        let pre_filter = request
            .pre_filter
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let mut args = Vec::new();
        let search = search::compile_search(&request.params, scope, &mut args);
        let filters = filter::compile_filters(&request.params, scope, &mut args)?;
        let sort = sort::compile_sort(&request.params, &request.default_sort, scope);
        let page = page::plan_page(&request.params, scope);

        Ok(Self {
            shell,
            pre_filter,
            search,
            filters,
            sort,
            page,
            args,
            count_alias: scope.config.count_alias.clone(),
        })
    }

    /// `(pre_filter) AND search AND filters`, skipping empty parts.
    ///
    /// The pre-filter is parenthesized so an `OR` inside it cannot pull the
    /// compiled predicates out of the conjunction.
    pub fn where_clause(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(pre) = &self.pre_filter {
            parts.push(format!("({})", pre));
        }
        if let Some(group) = search_group(&self.search) {
            parts.push(group);
        }
        if !self.filters.is_empty() {
            parts.push(join_conditions(&self.filters, " AND "));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" AND "))
        }
    }

    pub fn order_by(&self) -> Option<String> {
        order_by(&self.sort)
    }

    /// Shell plus WHERE; shared by the page and count statements.
    fn filtered(&self) -> String {
        let mut sql = self.shell.clone();
        if let Some(clause) = self.where_clause() {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
        sql
    }

    pub fn sql(&self) -> String {
        let mut sql = self.filtered();
        if let Some(order) = self.order_by() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
        }
        sql.push_str(&format!(" LIMIT {} OFFSET {}", self.page.limit, self.page.offset));
        sql
    }

    pub fn count_sql(&self) -> String {
        format!("SELECT count(1) FROM ({}) AS {}", self.filtered(), self.count_alias)
    }

    pub fn into_statement(self) -> CompiledStatement {
        CompiledStatement {
            sql: self.sql(),
            count_sql: self.count_sql(),
            page: self.page.page,
            limit: self.page.limit,
            offset: self.page.offset,
            total: None,
            args: self.args,
        }
    }
}
