//! Compiled fragments of a paginated query.

pub mod operators;
pub mod values;

pub use operators::*;
pub use values::*;

/// A single predicate, already qualified and bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `<column> <op> $<param>`
    Compare {
        column: String,
        op: Operator,
        param: usize,
    },
    /// `<column> iLIKE '%' || $<param> || '%'`
    Contains { column: String, param: usize },
}

impl Condition {
    /// The qualified column this condition references.
    pub fn column(&self) -> &str {
        match self {
            Condition::Compare { column, .. } | Condition::Contains { column, .. } => column,
        }
    }

    /// The 1-based placeholder index.
    pub fn param(&self) -> usize {
        match self {
            Condition::Compare { param, .. } | Condition::Contains { param, .. } => *param,
        }
    }
}

/// One `ORDER BY` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub column: String,
    pub order: SortOrder,
}

/// The pieces of a `filters[<field>:<op>]` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKey<'a> {
    pub field: &'a str,
    pub op: &'a str,
}
