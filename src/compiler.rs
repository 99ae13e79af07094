//! The compiler entry points.

use std::sync::Arc;

use crate::config::CompilerConfig;
use crate::error::RqlResult;
use crate::report::{Reporter, TracingReporter};
use crate::request::PaginationRequest;
use crate::statement::CompiledStatement;
use crate::transpiler::{Plan, Scope};

/// Compiles [`PaginationRequest`]s into [`CompiledStatement`]s.
///
/// Holds only immutable configuration, so one instance can be shared across
/// request handlers behind an `Arc`. Reloading configuration means building a
/// new compiler.
#[derive(Clone)]
pub struct Compiler {
    config: CompilerConfig,
    reporter: Arc<dyn Reporter>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Compiler {
    /// A compiler reporting dropped request parts through `tracing`.
    pub fn new(config: CompilerConfig) -> Self {
        Self::with_reporter(config, Arc::new(TracingReporter))
    }

    pub fn with_reporter(config: CompilerConfig, reporter: Arc<dyn Reporter>) -> Self {
        Self { config, reporter }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile the request into its stages without rendering them.
    pub fn plan(&self, request: &PaginationRequest) -> RqlResult<Plan> {
        let scope = Scope::new(
            &request.alias,
            &request.allowed_fields,
            &self.config,
            self.reporter.as_ref(),
        );
        Plan::build(request, &scope)
    }

    /// Compile the page statement and its count statement.
    pub fn compile(&self, request: &PaginationRequest) -> RqlResult<CompiledStatement> {
        let statement = self.plan(request)?.into_statement();
        tracing::trace!(
            sql = %statement.sql,
            args = statement.args.len(),
            "compiled paginated query"
        );
        Ok(statement)
    }

    /// Same as [`Compiler::compile`], for callers that only read
    /// `count_sql` and `count_args()`.
    pub fn compile_count(&self, request: &PaginationRequest) -> RqlResult<CompiledStatement> {
        self.compile(request)
    }
}
