//! End-to-end scheduler contract on fake nodes: fault isolation, mount
//! ordering, output accumulation, and skip accounting.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ofstest_core::engine::scheduler::Scheduler;
use ofstest_core::errors::HarnessError;
use ofstest_core::model::{
    worst_exit, EntryOutcome, ModuleConfig, TestEntry, TestModule, TestStatus,
};
use ofstest_core::modules::NotImplementedEntry;
use ofstest_core::network::fake::FakeNetwork;
use ofstest_core::network::Network;
use ofstest_core::node::fake::FakeNode;
use ofstest_core::node::local::LocalNode;
use ofstest_core::node::{Node, NodePaths};

fn config(mount_fs: bool) -> ModuleConfig {
    ModuleConfig {
        header: "Contract".into(),
        prefix: "contract".into(),
        mount_fs,
        mount_as_fuse: false,
        run_client: false,
    }
}

/// Runs one command named after the entry.
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

/// Issues two sequential commands and folds their return codes.
struct TwoCommandEntry;

#[async_trait]
impl TestEntry for TwoCommandEntry {
    fn name(&self) -> &str {
        "two_commands"
    }

    async fn run(
        &self,
        node: &dyn Node,
        _network: &dyn Network,
        output: &mut Vec<String>,
    ) -> Result<EntryOutcome, HarnessError> {
        let mut rc = node.run_single_command("first", output).await?;
        rc = worst_exit(rc, node.run_single_command("second", output).await?);
        Ok(EntryOutcome::Exit(rc))
    }
}

/// Appends to a shared event log so tests can assert mount ordering.
struct LoggingEntry {
    name: &'static str,
    events: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl TestEntry for LoggingEntry {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(
        &self,
        _node: &dyn Node,
        _network: &dyn Network,
        _output: &mut Vec<String>,
    ) -> Result<EntryOutcome, HarnessError> {
        self.events
            .lock()
            .expect("event log poisoned")
            .push(format!("entry:{}", self.name));
        Ok(EntryOutcome::Exit(0))
    }
}

#[tokio::test]
async fn unreachable_node_does_not_stop_later_entries() {
    let node = Arc::new(FakeNode::new("n1", FakeNode::default_paths()));
    node.push_exit(0, &["ok"]);
    node.push_unreachable();
    node.push_exit(0, &["still here"]);
    let network = FakeNetwork::new(vec![node as Arc<dyn Node>]);

    let module = TestModule::new(
        config(false),
        vec![
            Box::new(CommandEntry { name: "a" }),
            Box::new(CommandEntry { name: "b" }),
            Box::new(CommandEntry { name: "c" }),
        ],
    )
    .expect("non-empty");

    let summary = Scheduler::default().run_module(&module, &network).await;

    // One outcome per declared entry, in declared order.
    assert_eq!(summary.results.len(), 3);
    assert!(!summary.partial);
    assert_eq!(summary.results[0].name, "a");
    assert_eq!(summary.results[0].status, TestStatus::Pass);
    assert_eq!(summary.results[0].output, vec!["ok".to_string()]);
    assert_eq!(summary.results[1].status, TestStatus::Error);
    assert!(summary.results[1].message.contains("unreachable"));
    assert_eq!(summary.results[2].status, TestStatus::Pass);
    assert_eq!(summary.results[2].output, vec!["still here".to_string()]);
}

#[tokio::test]
async fn mount_strictly_brackets_entry_execution() {
    let node = Arc::new(FakeNode::new("n1", FakeNode::default_paths()));
    let network = FakeNetwork::new(vec![node as Arc<dyn Node>]);
    let events = network.events.clone();

    let module = TestModule::new(
        config(true),
        vec![
            Box::new(LoggingEntry {
                name: "a",
                events: events.clone(),
            }),
            Box::new(LoggingEntry {
                name: "b",
                events: events.clone(),
            }),
        ],
    )
    .expect("non-empty");

    let summary = Scheduler::default().run_module(&module, &network).await;
    assert_eq!(summary.results.len(), 2);
    assert_eq!(
        *events.lock().expect("event log poisoned"),
        vec![
            "mount".to_string(),
            "entry:a".to_string(),
            "entry:b".to_string(),
            "unmount".to_string(),
        ]
    );
}

#[tokio::test]
async fn mount_failure_records_entries_as_errored_without_invoking_them() {
    let node = Arc::new(FakeNode::new("n1", FakeNode::default_paths()));
    let network = FakeNetwork::new(vec![node as Arc<dyn Node>]).with_failing_mount();
    let events = network.events.clone();

    let module = TestModule::new(
        config(true),
        vec![Box::new(LoggingEntry {
            name: "a",
            events: events.clone(),
        })],
    )
    .expect("non-empty");

    let summary = Scheduler::default().run_module(&module, &network).await;
    assert!(summary.mount_error.is_some());
    assert_eq!(summary.results.len(), 1);
    assert_eq!(summary.results[0].status, TestStatus::Error);
    assert_eq!(summary.results[0].message, "required mount absent");
    // Mount was attempted; the entry never ran and nothing was unmounted.
    assert_eq!(*events.lock().expect("event log poisoned"), vec!["mount".to_string()]);
}

#[tokio::test]
async fn output_accumulates_across_sequential_commands_and_worst_code_wins() {
    let node = Arc::new(FakeNode::new("n1", FakeNode::default_paths()));
    node.push_exit(5, &["first failed"]);
    node.push_exit(0, &["second ok"]);
    let network = FakeNetwork::new(vec![node as Arc<dyn Node>]);

    let module =
        TestModule::new(config(false), vec![Box::new(TwoCommandEntry)]).expect("non-empty");
    let summary = Scheduler::default().run_module(&module, &network).await;

    assert_eq!(summary.results[0].status, TestStatus::Fail);
    assert_eq!(summary.results[0].exit_code, Some(5));
    assert_eq!(
        summary.results[0].output,
        vec!["first failed".to_string(), "second ok".to_string()]
    );
}

/// Runs a caller-supplied shell command verbatim.
struct ShellEntry {
    command: String,
}

#[async_trait]
impl TestEntry for ShellEntry {
    fn name(&self) -> &str {
        "shell"
    }

    async fn run(
        &self,
        node: &dyn Node,
        _network: &dyn Network,
        output: &mut Vec<String>,
    ) -> Result<EntryOutcome, HarnessError> {
        let rc = node.run_single_command(&self.command, output).await?;
        Ok(EntryOutcome::Exit(rc))
    }
}

/// Aborts the whole module run.
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

#[tokio::test]
async fn timed_out_command_leaves_no_side_effects_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let marker = dir.path().join("marker");
    let node = Arc::new(LocalNode::new(NodePaths {
        mount_point: "/mnt/ofs".into(),
        romio_runtests: "/opt/romio/runtests".into(),
        romio_test_dir: "/opt/romio/test".into(),
    }));
    let network = FakeNetwork::new(vec![node as Arc<dyn Node>]);

    let module = TestModule::new(
        config(false),
        vec![Box::new(ShellEntry {
            command: format!("sleep 2 && touch {}", marker.display()),
        })],
    )
    .expect("non-empty");

    let scheduler = Scheduler {
        entry_timeout_secs: Some(1),
    };
    let summary = scheduler.run_module(&module, &network).await;
    assert_eq!(summary.results[0].status, TestStatus::Error);
    assert!(summary.results[0].message.contains("timed out"));

    // Long enough for the sleep to have finished had the shell survived
    // the timeout. The marker must never appear.
    tokio::time::sleep(std::time::Duration::from_millis(2500)).await;
    assert!(!marker.exists(), "command kept running past its timeout");
}

#[tokio::test]
async fn fatal_abort_still_unmounts_a_mounted_filesystem() {
    let node = Arc::new(FakeNode::new("n1", FakeNode::default_paths()));
    let network = FakeNetwork::new(vec![node as Arc<dyn Node>]);
    let events = network.events.clone();

    let module = TestModule::new(
        config(true),
        vec![
            Box::new(LoggingEntry {
                name: "a",
                events: events.clone(),
            }),
            Box::new(FatalEntry),
            Box::new(LoggingEntry {
                name: "never",
                events: events.clone(),
            }),
        ],
    )
    .expect("non-empty");

    let summary = Scheduler::default().run_module(&module, &network).await;
    assert!(summary.partial);
    assert!(summary.unmount_error.is_none());
    assert_eq!(
        *events.lock().expect("event log poisoned"),
        vec![
            "mount".to_string(),
            "entry:a".to_string(),
            "unmount".to_string(),
        ]
    );
}

#[tokio::test]
async fn not_implemented_entries_are_skipped_not_passed() {
    let node = Arc::new(FakeNode::new("n1", FakeNode::default_paths()));
    node.push_exit(0, &[]);
    let network = FakeNetwork::new(vec![node as Arc<dyn Node>]);

    let module = TestModule::new(
        config(false),
        vec![
            Box::new(CommandEntry { name: "real" }),
            Box::new(NotImplementedEntry::new("stubbed")),
        ],
    )
    .expect("non-empty");

    let summary = Scheduler::default().run_module(&module, &network).await;
    assert_eq!(summary.results[0].status, TestStatus::Pass);
    assert_eq!(summary.results[1].status, TestStatus::Skipped);
    assert_eq!(summary.results[1].message, "not implemented");

    let counts = ofstest_core::report::counts(&[summary]);
    assert_eq!(counts.passed, 1);
    assert_eq!(counts.skipped, 1);
    assert_eq!(counts.failed, 0);
}
