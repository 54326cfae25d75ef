use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;
use crate::network::Network;
use crate::node::Node;

/// Immutable per-suite metadata, constructed once at registration time.
///
/// This is the entire surface a plugin module presents to the scheduler
/// besides its entry list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Human-readable suite name for reports.
    pub header: String,
    /// Namespacing key for generated artifact and log names.
    pub prefix: String,
    /// Whether the distributed filesystem must be mounted before any entry
    /// in this module runs.
    pub mount_fs: bool,
    /// FUSE-based vs native kernel mount, when mounting is required.
    pub mount_as_fuse: bool,
    /// Whether entries execute from a dedicated client role rather than any
    /// node.
    pub run_client: bool,
}

/// Verdict for one executed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Command exited zero.
    Pass,
    /// Command ran to completion and exited non-zero.
    Fail,
    /// Infrastructure could not execute the entry at all.
    Error,
    /// Entry is a declared stub with no implementation yet.
    Skipped,
}

/// What an entry's `run` returns on the non-error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The remote command's exit status, uninterpreted. Zero is success.
    Exit(i32),
    /// Declared but not ported; reported as Skipped, never as a pass.
    NotImplemented,
}

/// Non-zero wins. Entries issuing several sequential commands fold their
/// return codes with this so an early failure is not masked by a later
/// success.
pub fn worst_exit(acc: i32, next: i32) -> i32 {
    if acc != 0 {
        acc
    } else {
        next
    }
}

/// One named, runnable unit inside a test module.
///
/// Contract: test failure is signaled through [`EntryOutcome`], never
/// through `Err`. `Err` is reserved for infrastructure conditions the entry
/// cannot classify (node unreachable); the scheduler records those as
/// `Error` and continues with the next entry.
#[async_trait]
pub trait TestEntry: Send + Sync {
    fn name(&self) -> &str;

    /// Runs the entry against `node`, with the full `network` available for
    /// entries that need to address other participants. `output` is a fresh
    /// buffer allocated by the caller; the entry only ever appends to it.
    async fn run(
        &self,
        node: &dyn Node,
        network: &dyn Network,
        output: &mut Vec<String>,
    ) -> Result<EntryOutcome, HarnessError>;
}

/// A declarative test suite: metadata plus an ordered entry list.
/// Insertion order is execution order.
pub struct TestModule {
    pub config: ModuleConfig,
    entries: Vec<Box<dyn TestEntry>>,
}

impl TestModule {
    /// An empty module is a configuration error, not a silent no-op.
    pub fn new(
        config: ModuleConfig,
        entries: Vec<Box<dyn TestEntry>>,
    ) -> Result<Self, HarnessError> {
        if entries.is_empty() {
            return Err(HarnessError::config(format!(
                "module {} declares no entries",
                config.prefix
            )));
        }
        Ok(Self { config, entries })
    }

    pub fn entries(&self) -> &[Box<dyn TestEntry>] {
        &self.entries
    }
}

/// Outcome of one entry, as recorded in the run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResult {
    pub name: String,
    pub status: TestStatus,
    /// Present only when the command actually ran to completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Captured stdout+stderr lines in emission order.
    pub output: Vec<String>,
    pub message: String,
    pub duration_ms: u64,
}

/// Aggregated outcome of one module's run.
///
/// Created empty when the module starts, populated incrementally, read-only
/// once the module completes. A completed run holds exactly one result per
/// declared entry; `partial` is set only when a fatal error aborted the
/// module before all entries were attempted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub header: String,
    pub prefix: String,
    pub results: Vec<EntryResult>,
    /// Mount/unmount failures are recorded against the module, not against
    /// individual entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmount_error: Option<String>,
    pub partial: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_module_is_a_config_error() {
        let config = ModuleConfig {
            header: "Empty".into(),
            prefix: "empty".into(),
            mount_fs: false,
            mount_as_fuse: false,
            run_client: false,
        };
        let err = TestModule::new(config, Vec::new()).err().expect("must fail");
        assert!(err.to_string().contains("config error"));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn worst_exit_keeps_the_first_nonzero_code() {
        assert_eq!(worst_exit(0, 0), 0);
        assert_eq!(worst_exit(0, 3), 3);
        assert_eq!(worst_exit(2, 0), 2);
        assert_eq!(worst_exit(2, 5), 2);
    }
}
