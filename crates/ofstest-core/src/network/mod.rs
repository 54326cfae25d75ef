//! The set of nodes participating in one test run.

pub mod fake;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{ClusterConfig, NodeRole};
use crate::errors::HarnessError;
use crate::node::local::LocalNode;
use crate::node::ssh::SshNode;
use crate::node::Node;

/// Supplies the nodes a test should run against and owns the mount/unmount
/// boundary. Mount mechanics themselves are ordinary remote commands; their
/// failures surface as [`HarnessError::Mount`] for the scheduler to record
/// against the module.
#[async_trait]
pub trait Network: Send + Sync {
    fn nodes(&self) -> Vec<Arc<dyn Node>>;

    /// The dedicated client-role node, for modules with `run_client` set.
    fn client_node(&self) -> Result<Arc<dyn Node>, HarnessError>;

    /// Any participating node, for modules without a client requirement.
    fn any_node(&self) -> Result<Arc<dyn Node>, HarnessError>;

    /// Network-wide generated host-list file, consumed by the MPI process
    /// manager.
    fn hosts_file(&self) -> &str;

    async fn mount(&self, as_fuse: bool) -> Result<(), HarnessError>;

    async fn unmount(&self) -> Result<(), HarnessError>;
}

/// A real cluster: SSH-driven client and server nodes built from a
/// [`ClusterConfig`].
pub struct ClusterNetwork {
    clients: Vec<Arc<dyn Node>>,
    servers: Vec<Arc<dyn Node>>,
    hosts_file: String,
    mount_point: String,
    fs_spec: String,
    pvfs2fuse: String,
}

impl ClusterNetwork {
    pub fn from_config(config: &ClusterConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        let paths = config.node_paths();
        let mut clients: Vec<Arc<dyn Node>> = Vec::new();
        let mut servers: Vec<Arc<dyn Node>> = Vec::new();
        for node in &config.nodes {
            let built: Arc<dyn Node> = Arc::new(SshNode::new(
                node.hostname.clone(),
                node.ssh_user.clone(),
                paths.clone(),
            ));
            match node.role {
                NodeRole::Client => clients.push(built),
                NodeRole::Server => servers.push(built),
            }
        }
        Ok(Self {
            clients,
            servers,
            hosts_file: config.openmpi_hosts_file.clone(),
            mount_point: config.mount_point.clone(),
            fs_spec: config.fs_spec.clone(),
            pvfs2fuse: config.pvfs2fuse.clone(),
        })
    }

    /// Single-machine variant: every command runs on the local host. Used
    /// for smoke runs without a provisioned cluster.
    pub fn local(config: &ClusterConfig) -> Self {
        let node: Arc<dyn Node> = Arc::new(LocalNode::new(config.node_paths()));
        Self {
            clients: vec![node],
            servers: Vec::new(),
            hosts_file: config.openmpi_hosts_file.clone(),
            mount_point: config.mount_point.clone(),
            fs_spec: config.fs_spec.clone(),
            pvfs2fuse: config.pvfs2fuse.clone(),
        }
    }

    fn mount_command(&self, as_fuse: bool) -> String {
        if as_fuse {
            format!(
                "{} -o fs_spec={} {}",
                self.pvfs2fuse, self.fs_spec, self.mount_point
            )
        } else {
            format!("sudo mount -t pvfs2 {} {}", self.fs_spec, self.mount_point)
        }
    }
}

#[async_trait]
impl Network for ClusterNetwork {
    fn nodes(&self) -> Vec<Arc<dyn Node>> {
        self.clients.iter().chain(&self.servers).cloned().collect()
    }

    fn client_node(&self) -> Result<Arc<dyn Node>, HarnessError> {
        self.clients
            .first()
            .cloned()
            .ok_or_else(|| HarnessError::config("cluster has no client nodes"))
    }

    fn any_node(&self) -> Result<Arc<dyn Node>, HarnessError> {
        self.clients
            .first()
            .or_else(|| self.servers.first())
            .cloned()
            .ok_or_else(|| HarnessError::config("cluster has no nodes"))
    }

    fn hosts_file(&self) -> &str {
        &self.hosts_file
    }

    async fn mount(&self, as_fuse: bool) -> Result<(), HarnessError> {
        let command = self.mount_command(as_fuse);
        for node in &self.clients {
            info!(node = node.hostname(), %command, "mounting filesystem");
            let mut output = Vec::new();
            let rc = node.run_single_command(&command, &mut output).await?;
            if rc != 0 {
                return Err(HarnessError::Mount(format!(
                    "{} on {}: exit code {}: {}",
                    command,
                    node.hostname(),
                    rc,
                    output.join(" / ")
                )));
            }
        }
        Ok(())
    }

    async fn unmount(&self) -> Result<(), HarnessError> {
        let command = format!("sudo umount {}", self.mount_point);
        for node in &self.clients {
            info!(node = node.hostname(), %command, "unmounting filesystem");
            let mut output = Vec::new();
            let rc = node.run_single_command(&command, &mut output).await?;
            if rc != 0 {
                return Err(HarnessError::Mount(format!(
                    "{} on {}: exit code {}: {}",
                    command,
                    node.hostname(),
                    rc,
                    output.join(" / ")
                )));
            }
        }
        Ok(())
    }
}
