//! Compiler output.

use serde::Serialize;

use crate::ast::Value;

/// A paginated statement and its companion count statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledStatement {
    /// The page query.
    pub sql: String,
    /// `SELECT count(1)` over the same filters, without sort or limit.
    pub count_sql: String,
    /// Bind values; `args[i]` binds `$i+1`.
    pub args: Vec<Value>,
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
    /// Set by [`CompiledStatement::with_total`] once `count_sql` has run.
    pub total: Option<i64>,
}

impl CompiledStatement {
    /// Bind values for `count_sql`.
    ///
    /// The count statement carries the same WHERE clause as `sql`, so its
    /// placeholders are numbered `$1..$n` over the same values.
    pub fn count_args(&self) -> &[Value] {
        &self.args
    }

    pub fn with_total(mut self, total: i64) -> Self {
        self.total = Some(total);
        self
    }

    /// Pagination block for a response envelope.
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            page: self.page,
            size: self.limit,
            total: self.total.unwrap_or(0),
        }
    }
}

/// `{"page": 1, "size": 20, "total": 57}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub size: i64,
    pub total: i64,
}

impl PageMeta {
    /// Number of pages needed for `total` rows; zero when the size is zero.
    pub fn pages(&self) -> i64 {
        if self.size <= 0 {
            return 0;
        }
        self.total / self.size + i64::from(self.total % self.size != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement() -> CompiledStatement {
        CompiledStatement {
            sql: String::new(),
            count_sql: String::new(),
            args: vec![Value::Int(1)],
            page: 2,
            limit: 20,
            offset: 20,
            total: None,
        }
    }

    #[test]
    fn test_meta_after_total() {
        let meta = statement().with_total(57).meta();
        assert_eq!(meta, PageMeta { page: 2, size: 20, total: 57 });
        assert_eq!(meta.pages(), 3);
        assert_eq!(
            serde_json::to_string(&meta).unwrap(),
            r#"{"page":2,"size":20,"total":57}"#
        );
    }

    #[test]
    fn test_pages_with_zero_size() {
        let meta = PageMeta { page: 1, size: 0, total: 10 };
        assert_eq!(meta.pages(), 0);
    }

    #[test]
    fn test_pages_with_huge_size() {
        let meta = PageMeta { page: 1, size: i64::MAX, total: 2 };
        assert_eq!(meta.pages(), 1);

        let meta = PageMeta { page: 1, size: i64::MAX, total: 0 };
        assert_eq!(meta.pages(), 0);
    }

    #[test]
    fn test_pages_exact_multiple() {
        let meta = PageMeta { page: 1, size: 10, total: 30 };
        assert_eq!(meta.pages(), 3);
    }

    #[test]
    fn test_count_args_match_args() {
        let stmt = statement();
        assert_eq!(stmt.count_args(), stmt.args.as_slice());
    }
}
