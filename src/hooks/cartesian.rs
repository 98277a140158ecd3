//! The pre-execution cartesian product check.
//!
//! Advisory only: the hook never changes the statement, never fails it, and
//! says nothing when it cannot analyse something.

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};

use crate::config::LinterConfig;
use crate::linter::{LintReport, Linter};
use crate::query::Statement;

use super::registry::{BeforeExecute, HookId, HookRegistry};

/// Where lint warnings go.
pub trait WarningSink: Send + Sync {
    fn warn(&self, report: &LintReport);
}

/// Emits warnings through the `log` facade, i.e. whatever logger the host
/// application has installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn warn(&self, report: &LintReport) {
        warn!("{}", report);
    }
}

/// Keeps reports in memory, for tests and for hosts that batch warnings.
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<LintReport>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<LintReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<LintReport> {
        std::mem::take(&mut *self.reports.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, report: &LintReport) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
    }
}

pub struct CartesianLintHook {
    enabled: bool,
    linter: Linter,
    sink: Arc<dyn WarningSink>,
}

impl CartesianLintHook {
    pub fn new(config: &LinterConfig) -> Self {
        Self::with_sink(config, Arc::new(LogSink))
    }

    pub fn with_sink(config: &LinterConfig, sink: Arc<dyn WarningSink>) -> Self {
        CartesianLintHook {
            enabled: config.enabled,
            linter: Linter::new(config),
            sink,
        }
    }

    /// Register this hook; remove it again with [`HookRegistry::remove`].
    pub fn install(self, registry: &HookRegistry) -> HookId {
        registry.register(Arc::new(self))
    }
}

impl BeforeExecute for CartesianLintHook {
    fn name(&self) -> &str {
        "cartesian_lint"
    }

    fn before_execute(&self, statement: &Statement) {
        if !self.enabled {
            return;
        }
        let Statement::Select(select) = statement else {
            return;
        };
        if select.froms().is_empty() {
            return;
        }

        match self.linter.lint(select) {
            Ok(reports) => {
                for report in &reports {
                    self.sink.warn(report);
                }
            }
            Err(e) => debug!("Cartesian lint skipped: {}", e),
        }
    }
}
