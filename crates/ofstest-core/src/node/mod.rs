//! One machine in the test cluster.
//!
//! A node carries durable working-directory state and knows where the
//! cluster-setup phase left its per-node artifacts (mount point, installed
//! test suites). Network-wide artifacts such as the host-list file live on
//! the [`crate::network::Network`] instead.

pub mod fake;
pub mod local;
pub mod ssh;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;

/// Paths the harness expects on every node, produced by cluster setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePaths {
    /// Local path under which the distributed filesystem is exposed.
    pub mount_point: String,
    /// ROMIO's own `runtests` driver script.
    pub romio_runtests: String,
    /// Directory of the installed ROMIO test suite.
    pub romio_test_dir: String,
}

#[async_trait]
pub trait Node: Send + Sync {
    fn hostname(&self) -> &str;

    fn paths(&self) -> &NodePaths;

    /// Changes the node's working directory. The change is durable for this
    /// node until changed again; it is process-wide per-node state, not
    /// per-call.
    fn change_directory(&self, path: &str);

    /// Runs one shell command line on the node and blocks until it
    /// terminates. Combined stdout+stderr lines are appended to `output` in
    /// emission order; the buffer is never replaced, so callers can
    /// accumulate output across sequential commands. A non-zero return code
    /// is data, not an `Err`; `Err` is reserved for transport failure.
    async fn run_single_command(
        &self,
        command: &str,
        output: &mut Vec<String>,
    ) -> Result<i32, HarnessError>;
}
