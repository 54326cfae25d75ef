use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::HarnessError;
use crate::node::{Node, NodePaths};

/// One scripted response, consumed in FIFO order per command.
#[derive(Debug, Clone)]
pub enum ScriptedCommand {
    Exit { code: i32, lines: Vec<String> },
    Unreachable,
}

/// In-memory node with scripted command results, for engine and module
/// tests. Records every executed command line so tests can assert on the
/// exact invocation.
pub struct FakeNode {
    hostname: String,
    paths: NodePaths,
    cwd: Mutex<Option<String>>,
    script: Mutex<VecDeque<ScriptedCommand>>,
    executed: Mutex<Vec<String>>,
}

impl FakeNode {
    pub fn new(hostname: impl Into<String>, paths: NodePaths) -> Self {
        Self {
            hostname: hostname.into(),
            paths,
            cwd: Mutex::new(None),
            script: Mutex::new(VecDeque::new()),
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn default_paths() -> NodePaths {
        NodePaths {
            mount_point: "/mnt/ofs".into(),
            romio_runtests: "/opt/romio/runtests".into(),
            romio_test_dir: "/opt/romio/test".into(),
        }
    }

    pub fn push_exit(&self, code: i32, lines: &[&str]) {
        self.script
            .lock()
            .expect("script mutex poisoned")
            .push_back(ScriptedCommand::Exit {
                code,
                lines: lines.iter().map(|l| (*l).to_string()).collect(),
            });
    }

    pub fn push_unreachable(&self) {
        self.script
            .lock()
            .expect("script mutex poisoned")
            .push_back(ScriptedCommand::Unreachable);
    }

    /// Command lines in execution order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().expect("executed mutex poisoned").clone()
    }

    pub fn cwd(&self) -> Option<String> {
        self.cwd.lock().expect("cwd mutex poisoned").clone()
    }
}

#[async_trait]
impl Node for FakeNode {
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
        self.executed
            .lock()
            .expect("executed mutex poisoned")
            .push(command.to_string());

        let next = self
            .script
            .lock()
            .expect("script mutex poisoned")
            .pop_front();
        match next {
            // Unscripted commands succeed silently.
            None => Ok(0),
            Some(ScriptedCommand::Exit { code, lines }) => {
                output.extend(lines);
                Ok(code)
            }
            Some(ScriptedCommand::Unreachable) => Err(HarnessError::NodeUnreachable {
                node: self.hostname.clone(),
                detail: "scripted unreachable".into(),
            }),
        }
    }
}
