//! # rql: query-string filters compiled to parameterized SQL
//!
//! rql turns the query string of a list endpoint into a paginated SQL
//! statement, a companion count statement and an ordered list of bind values.
//! Column names only reach the SQL text through an allow-list; values only
//! through positional placeholders.
//!
//! ## Quick Example
//!
//! ```
//! use rql::prelude::*;
//!
//! let request = PaginationRequest::builder()
//!     .base_query("SELECT id, name, category FROM groups")
//!     .query_string("filters[id:gt]=77&sort=-name&page[size]=10")
//!     .allow(["id", "name", "category"])
//!     .alias("g")
//!     .build()?;
//!
//! let stmt = rql::compile(&request)?;
//! assert_eq!(
//!     stmt.sql,
//!     "SELECT * FROM (SELECT id, name, category FROM groups) AS g \
//!      WHERE g.id > $1 ORDER BY g.name DESC LIMIT 10 OFFSET 0"
//! );
//! assert_eq!(stmt.args, vec![Value::Int(77)]);
//! # Ok::<(), rql::error::RqlError>(())
//! ```
//!
//! ## Recognized keys
//!
//! | Key                      | Meaning                                   |
//! |--------------------------|-------------------------------------------|
//! | `filters[<field>:<op>]`  | `field <op> $n`, repeatable               |
//! | `fields` + `q`           | `field iLIKE '%' \|\| $n \|\| '%'`, OR-ed |
//! | `sort`                   | comma list, leading `-` for DESC          |
//! | `page[number]`           | 1-based page, default 1                   |
//! | `page[size]`             | rows per page, default 20                 |

pub mod ast;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod guard;
pub mod params;
pub mod parser;
pub mod report;
pub mod request;
pub mod statement;
pub mod transpiler;

pub use compiler::Compiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::compiler::Compiler;
    pub use crate::config::{CompilerConfig, FilterPolicy, Shell};
    pub use crate::engine::{Page, RqlDB};
    pub use crate::error::*;
    pub use crate::guard::{AllowList, Model};
    pub use crate::params::QueryParams;
    pub use crate::report::{Reporter, TracingReporter};
    pub use crate::request::PaginationRequest;
    pub use crate::statement::{CompiledStatement, PageMeta};
    pub use crate::transpiler::ToSql;
}

/// Compile a request with the default configuration.
pub fn compile(
    request: &request::PaginationRequest,
) -> Result<statement::CompiledStatement, error::RqlError> {
    Compiler::default().compile(request)
}
