//! Reporting of silently dropped request parts.
//!
//! The compiler never fails on a bad filter under the permissive policy; it
//! tells its [`Reporter`] instead. The reporter is handed to the compiler at
//! construction time.

use std::sync::Mutex;

/// Where a dropped field was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Filter,
    Search,
    Sort,
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Clause::Filter => write!(f, "filter"),
            Clause::Search => write!(f, "search"),
            Clause::Sort => write!(f, "sort"),
        }
    }
}

/// Something the compiler ignored or adjusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropped {
    /// A field outside the allow-list.
    DisallowedField { clause: Clause, field: String },
    /// A `filters[...]` key without the `field:op` shape.
    MalformedFilter { key: String },
    /// An operator outside the table; compiled as `=`.
    UnknownOperator { key: String, op: String },
    /// A pagination value that did not parse; the default was used.
    InvalidPage { param: &'static str, raw: String },
    /// A page size above the configured maximum.
    PageSizeClamped { requested: i64, max: i64 },
}

impl std::fmt::Display for Dropped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dropped::DisallowedField { clause, field } => {
                write!(f, "{} field '{}' is not allowed", clause, field)
            }
            Dropped::MalformedFilter { key } => write!(f, "malformed filter key '{}'", key),
            Dropped::UnknownOperator { key, op } => {
                write!(f, "unknown operator '{}' in '{}', using '='", op, key)
            }
            Dropped::InvalidPage { param, raw } => {
                write!(f, "invalid {} '{}', using default", param, raw)
            }
            Dropped::PageSizeClamped { requested, max } => {
                write!(f, "page size {} clamped to {}", requested, max)
            }
        }
    }
}

/// Receives every [`Dropped`] item produced during a compilation.
pub trait Reporter: Send + Sync {
    fn report(&self, drop: &Dropped);
}

/// Emits drops as `tracing` debug events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, drop: &Dropped) {
        tracing::debug!(target: "rql", "{}", drop);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _drop: &Dropped) {}
}

/// Keeps drops in memory, for callers that surface them (e.g. as response
/// warnings) and for tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    drops: Mutex<Vec<Dropped>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything collected so far.
    pub fn take(&self) -> Vec<Dropped> {
        match self.drops.lock() {
            Ok(mut drops) => std::mem::take(&mut *drops),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, drop: &Dropped) {
        match self.drops.lock() {
            Ok(mut drops) => drops.push(drop.clone()),
            Err(poisoned) => poisoned.into_inner().push(drop.clone()),
        }
    }
}
