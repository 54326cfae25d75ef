use chrono::Utc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{info, warn};

use crate::errors::HarnessError;
use crate::model::{EntryOutcome, EntryResult, ModuleConfig, RunSummary, TestEntry, TestModule, TestStatus};
use crate::network::Network;

/// Runs modules one at a time, entries in declared order.
///
/// Per module: Pending → (Mounting if required) → Running entries →
/// (Unmounting if it mounted) → Completed. One entry's infrastructure
/// failure never stops the remaining entries; only a fatal error aborts,
/// leaving the summary marked partial.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    /// Optional wall-clock limit per entry. Expiry yields a well-formed
    /// Error outcome, never an undefined result.
    pub entry_timeout_secs: Option<u64>,
}

impl Scheduler {
    pub async fn run_all(&self, modules: &[TestModule], network: &dyn Network) -> Vec<RunSummary> {
        let mut summaries = Vec::with_capacity(modules.len());
        for module in modules {
            let summary = self.run_module(module, network).await;
            let aborted = summary.partial;
            summaries.push(summary);
            if aborted {
                warn!("fatal error; remaining modules not scheduled");
                break;
            }
        }
        summaries
    }

    pub async fn run_module(&self, module: &TestModule, network: &dyn Network) -> RunSummary {
        let started_at = Utc::now();
        info!(header = %module.config.header, entries = module.entries().len(), "running module");

        let mut summary = RunSummary {
            header: module.config.header.clone(),
            prefix: module.config.prefix.clone(),
            results: Vec::with_capacity(module.entries().len()),
            mount_error: None,
            unmount_error: None,
            partial: false,
            started_at,
            finished_at: started_at,
        };

        let mut mounted = false;
        if module.config.mount_fs {
            match network.mount(module.config.mount_as_fuse).await {
                Ok(()) => mounted = true,
                Err(e) => {
                    warn!(error = %e, "mount failed; entries will not be invoked");
                    summary.mount_error = Some(e.to_string());
                }
            }
        }

        if module.config.mount_fs && !mounted {
            // Still one outcome per declared entry.
            for entry in module.entries() {
                summary.results.push(EntryResult {
                    name: entry.name().to_string(),
                    status: TestStatus::Error,
                    exit_code: None,
                    output: Vec::new(),
                    message: "required mount absent".into(),
                    duration_ms: 0,
                });
            }
        } else {
            for entry in module.entries() {
                let (result, fatal) = self
                    .run_entry(entry.as_ref(), &module.config, network)
                    .await;
                summary.results.push(result);
                if fatal {
                    summary.partial = true;
                    break;
                }
            }
            // Best-effort, even after a fatal abort: the filesystem must
            // not stay mounted on the module's account.
            if mounted {
                if let Err(e) = network.unmount().await {
                    warn!(error = %e, "unmount failed");
                    summary.unmount_error = Some(e.to_string());
                }
            }
        }

        summary.finished_at = Utc::now();
        summary
    }

    async fn run_entry(
        &self,
        entry: &dyn TestEntry,
        config: &ModuleConfig,
        network: &dyn Network,
    ) -> (EntryResult, bool) {
        let start = Instant::now();
        let mut output = Vec::new();

        let target = if config.run_client {
            network.client_node()
        } else {
            network.any_node()
        };
        let node = match target {
            Ok(node) => node,
            Err(e) => {
                return (
                    entry_error(entry, output, &e, start.elapsed().as_millis() as u64),
                    e.is_fatal(),
                )
            }
        };

        let run = entry.run(node.as_ref(), network, &mut output);
        let outcome = match self.entry_timeout_secs {
            Some(secs) => match timeout(Duration::from_secs(secs), run).await {
                Ok(res) => res,
                Err(_) => Err(HarnessError::Timeout { secs }),
            },
            None => run.await,
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(EntryOutcome::Exit(code)) => {
                let status = if code == 0 {
                    TestStatus::Pass
                } else {
                    TestStatus::Fail
                };
                let message = if code == 0 {
                    "ok".to_string()
                } else {
                    format!("exit code {}", code)
                };
                (
                    EntryResult {
                        name: entry.name().to_string(),
                        status,
                        exit_code: Some(code),
                        output,
                        message,
                        duration_ms,
                    },
                    false,
                )
            }
            Ok(EntryOutcome::NotImplemented) => (
                EntryResult {
                    name: entry.name().to_string(),
                    status: TestStatus::Skipped,
                    exit_code: None,
                    output,
                    message: "not implemented".into(),
                    duration_ms,
                },
                false,
            ),
            Err(e) => {
                warn!(entry = entry.name(), error = %e, "entry errored");
                let fatal = e.is_fatal();
                (entry_error(entry, output, &e, duration_ms), fatal)
            }
        }
    }
}

fn entry_error(
    entry: &dyn TestEntry,
    output: Vec<String>,
    error: &HarnessError,
    duration_ms: u64,
) -> EntryResult {
    EntryResult {
        name: entry.name().to_string(),
        status: TestStatus::Error,
        exit_code: None,
        output,
        message: error.to_string(),
        duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModuleConfig;
    use crate::network::fake::FakeNetwork;
    use crate::node::fake::FakeNode;
    use crate::node::Node;
    use async_trait::async_trait;
    use std::sync::Arc;

    fn module_config() -> ModuleConfig {
        ModuleConfig {
            header: "Scheduler Contract".into(),
            prefix: "sched".into(),
            mount_fs: false,
            mount_as_fuse: false,
            run_client: false,
        }
    }

    /// Runs one scripted command on the target node.
    struct CommandEntry {
        name: &'static str,
    }

    #[async_trait]
    impl TestEntry for CommandEntry {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(
            &self,
            node: &dyn Node,
            _network: &dyn Network,
            output: &mut Vec<String>,
        ) -> Result<EntryOutcome, HarnessError> {
            let rc = node.run_single_command(self.name, output).await?;
            Ok(EntryOutcome::Exit(rc))
        }
    }

    struct SleepyEntry;

    #[async_trait]
    impl TestEntry for SleepyEntry {
        fn name(&self) -> &str {
            "sleepy"
        }

        async fn run(
            &self,
            _node: &dyn Node,
            _network: &dyn Network,
            _output: &mut Vec<String>,
        ) -> Result<EntryOutcome, HarnessError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(EntryOutcome::Exit(0))
        }
    }

    struct FatalEntry;

    #[async_trait]
    impl TestEntry for FatalEntry {
        fn name(&self) -> &str {
            "fatal"
        }

        async fn run(
            &self,
            _node: &dyn Node,
            _network: &dyn Network,
            _output: &mut Vec<String>,
        ) -> Result<EntryOutcome, HarnessError> {
            Err(HarnessError::ClusterUnreachable("all nodes down".into()))
        }
    }

    fn network_with(node: Arc<FakeNode>) -> FakeNetwork {
        FakeNetwork::new(vec![node as Arc<dyn Node>])
    }

    #[tokio::test]
    async fn exit_code_zero_passes_nonzero_fails_nothing_else() {
        let node = Arc::new(FakeNode::new("n1", FakeNode::default_paths()));
        node.push_exit(0, &["ok"]);
        node.push_exit(42, &["boom"]);
        let network = network_with(node);

        let module = TestModule::new(
            module_config(),
            vec![
                Box::new(CommandEntry { name: "a" }),
                Box::new(CommandEntry { name: "b" }),
            ],
        )
        .expect("non-empty");

        let summary = Scheduler::default().run_module(&module, &network).await;
        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.results[0].status, TestStatus::Pass);
        assert_eq!(summary.results[0].exit_code, Some(0));
        assert_eq!(summary.results[1].status, TestStatus::Fail);
        assert_eq!(summary.results[1].exit_code, Some(42));
        assert!(!summary.partial);
    }

    #[tokio::test]
    async fn timeout_produces_wellformed_error_outcome() {
        let node = Arc::new(FakeNode::new("n1", FakeNode::default_paths()));
        let network = network_with(node);
        let module = TestModule::new(module_config(), vec![Box::new(SleepyEntry)])
            .expect("non-empty");

        let scheduler = Scheduler {
            entry_timeout_secs: Some(0),
        };
        let summary = scheduler.run_module(&module, &network).await;
        assert_eq!(summary.results.len(), 1);
        assert_eq!(summary.results[0].status, TestStatus::Error);
        assert!(summary.results[0].message.contains("timed out"));
    }

    #[tokio::test]
    async fn fatal_error_aborts_module_and_marks_summary_partial() {
        let node = Arc::new(FakeNode::new("n1", FakeNode::default_paths()));
        node.push_exit(0, &[]);
        let network = network_with(node);

        let module = TestModule::new(
            module_config(),
            vec![
                Box::new(CommandEntry { name: "a" }),
                Box::new(FatalEntry),
                Box::new(CommandEntry { name: "never-runs" }),
            ],
        )
        .expect("non-empty");

        let summary = Scheduler::default().run_module(&module, &network).await;
        assert!(summary.partial);
        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.results[1].status, TestStatus::Error);
    }

    #[tokio::test]
    async fn run_all_stops_scheduling_after_a_fatal_module() {
        let node = Arc::new(FakeNode::new("n1", FakeNode::default_paths()));
        let network = network_with(node);

        let fatal = TestModule::new(module_config(), vec![Box::new(FatalEntry)])
            .expect("non-empty");
        let after = TestModule::new(module_config(), vec![Box::new(CommandEntry { name: "a" })])
            .expect("non-empty");

        let summaries = Scheduler::default().run_all(&[fatal, after], &network).await;
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].partial);
    }
}
