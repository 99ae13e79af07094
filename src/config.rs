//! Compiler configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! default_page_size = 20
//! max_page_size = 500
//! filter_policy = "strict"
//! shell = "subquery"
//! count_alias = "tb_count"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RqlError, RqlResult};

/// What to do with a filter that cannot be compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPolicy {
    /// Drop it and keep the rest of the request.
    #[default]
    Permissive,
    /// Reject the whole request.
    Strict,
}

/// How the base query is turned into the outer statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    /// `SELECT * FROM (<base>) AS <alias>`
    #[default]
    Subquery,
    /// The base query as written; it must already expose the alias.
    Inline,
}

/// Settings shared by every compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// `page[size]` when absent or unparsable.
    pub default_page_size: i64,

    /// Upper bound for `page[size]`; unbounded when unset.
    pub max_page_size: Option<i64>,

    pub filter_policy: FilterPolicy,

    pub shell: Shell,

    /// Alias of the derived table in the count statement.
    pub count_alias: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: None,
            filter_policy: FilterPolicy::Permissive,
            shell: Shell::Subquery,
            count_alias: "tb_count".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Create a new configuration builder
    pub fn builder() -> CompilerConfigBuilder {
        CompilerConfigBuilder::default()
    }

    /// Read and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> RqlResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: CompilerConfig = toml::from_str(&content).map_err(|e| {
            RqlError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        tracing::debug!("Loaded compiler config from {}", path.display());
        Ok(config)
    }

    /// Load `./rql.toml`, then `<config dir>/rql/config.toml`, else defaults.
    pub fn discover() -> RqlResult<Self> {
        for path in Self::search_paths() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("rql.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("rql").join("config.toml"));
        }
        paths
    }

    pub fn validate(&self) -> RqlResult<()> {
        if self.default_page_size < 0 {
            return Err(RqlError::Config(format!(
                "default_page_size must not be negative, got {}",
                self.default_page_size
            )));
        }
        if let Some(max) = self.max_page_size {
            if max < 0 {
                return Err(RqlError::Config(format!(
                    "max_page_size must not be negative, got {}",
                    max
                )));
            }
        }
        let alias_ok = !self.count_alias.is_empty()
            && self
                .count_alias
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !alias_ok {
            return Err(RqlError::Config(format!(
                "count_alias must be a plain identifier, got '{}'",
                self.count_alias
            )));
        }
        Ok(())
    }
}

/// Builder for CompilerConfig
#[derive(Debug, Default)]
pub struct CompilerConfigBuilder {
    config: CompilerConfig,
}

impl CompilerConfigBuilder {
    pub fn default_page_size(mut self, size: i64) -> Self {
        self.config.default_page_size = size;
        self
    }

    pub fn max_page_size(mut self, max: i64) -> Self {
        self.config.max_page_size = Some(max);
        self
    }

    pub fn strict(mut self) -> Self {
        self.config.filter_policy = FilterPolicy::Strict;
        self
    }

    pub fn filter_policy(mut self, policy: FilterPolicy) -> Self {
        self.config.filter_policy = policy;
        self
    }

    pub fn shell(mut self, shell: Shell) -> Self {
        self.config.shell = shell;
        self
    }

    pub fn count_alias(mut self, alias: impl Into<String>) -> Self {
        self.config.count_alias = alias.into();
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> RqlResult<CompilerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
