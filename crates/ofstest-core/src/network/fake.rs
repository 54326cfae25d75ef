use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::HarnessError;
use crate::network::Network;
use crate::node::Node;

/// In-memory network for scheduler tests.
///
/// Mount and unmount append to a shared event log; tests hand the same log
/// to their entries to assert on ordering (mount strictly before the first
/// entry, unmount strictly after the last).
pub struct FakeNetwork {
    nodes: Vec<Arc<dyn Node>>,
    hosts_file: String,
    fail_mount: bool,
    pub events: Arc<Mutex<Vec<String>>>,
}

impl FakeNetwork {
    pub fn new(nodes: Vec<Arc<dyn Node>>) -> Self {
        Self {
            nodes,
            hosts_file: "/tmp/hosts123".into(),
            fail_mount: false,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_failing_mount(mut self) -> Self {
        self.fail_mount = true;
        self
    }
}

#[async_trait]
impl Network for FakeNetwork {
    fn nodes(&self) -> Vec<Arc<dyn Node>> {
        self.nodes.clone()
    }

    fn client_node(&self) -> Result<Arc<dyn Node>, HarnessError> {
        self.nodes
            .first()
            .cloned()
            .ok_or_else(|| HarnessError::config("fake network has no nodes"))
    }

    fn any_node(&self) -> Result<Arc<dyn Node>, HarnessError> {
        self.client_node()
    }

    fn hosts_file(&self) -> &str {
        &self.hosts_file
    }

    async fn mount(&self, as_fuse: bool) -> Result<(), HarnessError> {
        self.events
            .lock()
            .expect("event log poisoned")
            .push(if as_fuse { "mount(fuse)".into() } else { "mount".into() });
        if self.fail_mount {
            return Err(HarnessError::Mount("scripted mount failure".into()));
        }
        Ok(())
    }

    async fn unmount(&self) -> Result<(), HarnessError> {
        self.events
            .lock()
            .expect("event log poisoned")
            .push("unmount".into());
        Ok(())
    }
}
