use std::sync::Mutex;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::errors::HarnessError;
use crate::node::{Node, NodePaths};

/// Runs commands on the local machine through `sh -c`.
///
/// Used for single-machine smoke runs and for exercising the engine without
/// a cluster. Same shell wrapping as [`super::ssh::SshNode`].
pub struct LocalNode {
    paths: NodePaths,
    cwd: Mutex<Option<String>>,
}

impl LocalNode {
    pub fn new(paths: NodePaths) -> Self {
        Self {
            paths,
            cwd: Mutex::new(None),
        }
    }

    fn shell_command(&self, command: &str) -> String {
        let base = match self.cwd.lock().expect("cwd mutex poisoned").as_deref() {
            Some(dir) => format!("cd {} && {}", dir, command),
            None => command.to_string(),
        };
        // Brace group instead of a subshell: no extra fork, so killing the
        // shell stops the rest of the pipeline.
        format!("{{ {}; }} 2>&1", base)
    }
}

#[async_trait]
impl Node for LocalNode {
    fn hostname(&self) -> &str {
        "localhost"
    }

    fn paths(&self) -> &NodePaths {
        &self.paths
    }

    fn change_directory(&self, path: &str) {
        *self.cwd.lock().expect("cwd mutex poisoned") = Some(path.to_string());
    }

    async fn run_single_command(
        &self,
        command: &str,
        output: &mut Vec<String>,
    ) -> Result<i32, HarnessError> {
        let wrapped = self.shell_command(command);
        debug!(command = %wrapped, "local exec");
        let result = Command::new("sh")
            .arg("-c")
            .arg(&wrapped)
            // A harness-imposed timeout drops this future mid-flight; the
            // shell must die with it or the command outlives the entry.
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| HarnessError::CommandSpawn {
                node: "localhost".into(),
                source,
            })?;

        for line in String::from_utf8_lossy(&result.stdout).lines() {
            output.push(line.to_string());
        }
        for line in String::from_utf8_lossy(&result.stderr).lines() {
            output.push(line.to_string());
        }
        Ok(result.status.code().unwrap_or(-1))
    }
}
