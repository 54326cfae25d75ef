use std::sync::Mutex;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::errors::HarnessError;
use crate::node::{Node, NodePaths};

/// A cluster node driven over `ssh`.
///
/// Each command is wrapped as `{ cd <cwd> && <cmd>; } 2>&1` on the remote
/// side so stderr merges into stdout at the shell and captured lines keep
/// their emission order. The brace group does not fork, so the shell stays
/// the direct child and killing it stops the rest of the pipeline.
pub struct SshNode {
    hostname: String,
    ssh_user: Option<String>,
    paths: NodePaths,
    cwd: Mutex<Option<String>>,
}

impl SshNode {
    pub fn new(hostname: impl Into<String>, ssh_user: Option<String>, paths: NodePaths) -> Self {
        Self {
            hostname: hostname.into(),
            ssh_user,
            paths,
            cwd: Mutex::new(None),
        }
    }

    fn destination(&self) -> String {
        match &self.ssh_user {
            Some(user) => format!("{}@{}", user, self.hostname),
            None => self.hostname.clone(),
        }
    }

    fn remote_command(&self, command: &str) -> String {
        let base = match self.cwd.lock().expect("cwd mutex poisoned").as_deref() {
            Some(dir) => format!("cd {} && {}", dir, command),
            None => command.to_string(),
        };
        format!("{{ {}; }} 2>&1", base)
    }
}

#[async_trait]
impl Node for SshNode {
    fn hostname(&self) -> &str {
        &self.hostname
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
        let remote = self.remote_command(command);
        debug!(node = %self.hostname, command = %remote, "ssh exec");
        let result = Command::new("ssh")
            .arg("-o")
            .arg("BatchMode=yes")
            .arg(self.destination())
            .arg(&remote)
            // A harness-imposed timeout drops this future mid-flight; the
            // ssh client must die with it or the command outlives the entry.
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| HarnessError::CommandSpawn {
                node: self.hostname.clone(),
                source,
            })?;

        let code = result.status.code().unwrap_or(-1);
        for line in String::from_utf8_lossy(&result.stdout).lines() {
            output.push(line.to_string());
        }

        // ssh reserves 255 for its own failures (auth, DNS, refused
        // connection); the transport detail lands on local stderr.
        if code == 255 {
            return Err(HarnessError::NodeUnreachable {
                node: self.hostname.clone(),
                detail: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        for line in String::from_utf8_lossy(&result.stderr).lines() {
            output.push(line.to_string());
        }
        Ok(code)
    }
}
