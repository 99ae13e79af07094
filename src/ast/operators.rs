use serde::{Deserialize, Serialize};

/// Filter operator accepted in `filters[<field>:<op>]` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    Like,
    Or,
    And,
}

impl Operator {
    /// Every operator, in table order.
    pub const ALL: [Operator; 9] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Lt,
        Operator::Gt,
        Operator::Lte,
        Operator::Gte,
        Operator::Like,
        Operator::Or,
        Operator::And,
    ];

    /// Look up an operator by its query-string symbol. Case-sensitive.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "eq" => Some(Operator::Eq),
            "neq" => Some(Operator::Neq),
            "lt" => Some(Operator::Lt),
            "gt" => Some(Operator::Gt),
            "lte" => Some(Operator::Lte),
            "gte" => Some(Operator::Gte),
            "like" => Some(Operator::Like),
            "or" => Some(Operator::Or),
            "and" => Some(Operator::And),
            _ => None,
        }
    }

    /// Resolve a symbol, falling back to equality for anything unknown.
    pub fn resolve(symbol: &str) -> Self {
        Self::from_symbol(symbol).unwrap_or(Operator::Eq)
    }

    /// The query-string symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Lt => "lt",
            Operator::Gt => "gt",
            Operator::Lte => "lte",
            Operator::Gte => "gte",
            Operator::Like => "like",
            Operator::Or => "or",
            Operator::And => "and",
        }
    }

    /// SQL text emitted between the column and the placeholder.
    pub fn sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "<>",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Lte => "<=",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::Or => "OR",
            Operator::And => "AND",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql())
    }
}

/// Sort direction of an `ORDER BY` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}
