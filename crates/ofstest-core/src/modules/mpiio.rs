//! MPI-IO interoperability tests (ROMIO-derived) run against the mounted
//! filesystem.

use async_trait::async_trait;
use tracing::info;

use crate::errors::HarnessError;
use crate::model::{EntryOutcome, ModuleConfig, TestEntry, TestModule};
use crate::modules::NotImplementedEntry;
use crate::network::Network;
use crate::node::Node;

/// The ROMIO test suite that ships with MPICH and is also usable with
/// Open MPI. Talks to the MPI process manager directly; no batch scheduler
/// involved.
pub struct RomioTestsuite;

#[async_trait]
impl TestEntry for RomioTestsuite {
    fn name(&self) -> &str {
        "romio_testsuite"
    }

    async fn run(
        &self,
        node: &dyn Node,
        network: &dyn Network,
        output: &mut Vec<String>,
    ) -> Result<EntryOutcome, HarnessError> {
        let paths = node.paths();
        node.change_directory(&paths.romio_test_dir);
        // The host-list file is a network-wide artifact from cluster setup,
        // not a per-node path.
        let command = format!(
            "{} -machinefile={} -fname={}/romioruntests",
            paths.romio_runtests,
            network.hosts_file(),
            paths.mount_point
        );
        info!(node = node.hostname(), %command, "running romio testsuite");
        let rc = node.run_single_command(&command, output).await?;
        // The suite's aggregate exit status is trusted as-is; per-sub-test
        // result lines in the captured output are not cross-checked.
        Ok(EntryOutcome::Exit(rc))
    }
}

/// Declared tests that have not been ported yet. Kept visible so the
/// summary reports them as skipped.
const UNPORTED: &[&str] = &[
    "functions",
    "heidleberg_IO",
    "ior_mpiio",
    "ior_mpiio_3",
    "noncontig",
    "romio_async",
    "romio_coll_test",
    "romio_error",
    "romio_excl",
    "romio_file_info",
    "romio_noncontig_coll2",
    "romio_psimple",
    "romio_simple",
    "romio_split_coll",
    "romio_status",
    "stadler_file_view_test",
];

pub fn module() -> Result<TestModule, HarnessError> {
    let config = ModuleConfig {
        header: "OFS MPI-IO Test".into(),
        prefix: "mpiio".into(),
        mount_fs: false,
        mount_as_fuse: false,
        run_client: false,
    };
    let mut entries: Vec<Box<dyn TestEntry>> = vec![Box::new(RomioTestsuite)];
    for name in UNPORTED {
        entries.push(Box::new(NotImplementedEntry::new(name)));
    }
    TestModule::new(config, entries)
}
