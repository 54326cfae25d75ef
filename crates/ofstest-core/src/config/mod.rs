//! Cluster description, loaded from YAML at process start.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;
use crate::node::NodePaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    #[default]
    Client,
    Server,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeEntry {
    pub hostname: String,
    #[serde(default)]
    pub role: NodeRole,
    #[serde(default)]
    pub ssh_user: Option<String>,
}

/// Everything the harness needs to know about one cluster: participating
/// nodes and the paths cluster setup generated on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    pub nodes: Vec<NodeEntry>,
    /// Local path under which the distributed filesystem is exposed.
    pub mount_point: String,
    /// Filesystem spec handed to mount, e.g. `tcp://server:3334/pvfs2-fs`.
    pub fs_spec: String,
    /// Generated host-list file for the MPI process manager.
    pub openmpi_hosts_file: String,
    /// ROMIO's `runtests` driver script.
    pub romio_runtests: String,
    #[serde(default = "default_romio_test_dir")]
    pub romio_test_dir: String,
    #[serde(default = "default_pvfs2fuse")]
    pub pvfs2fuse: String,
}

fn default_romio_test_dir() -> String {
    "/opt/mpi/openmpi-1.6.5/ompi/mca/io/romio/romio/test".into()
}

fn default_pvfs2fuse() -> String {
    "/usr/bin/pvfs2fuse".into()
}

impl ClusterConfig {
    pub fn from_path(path: &Path) -> Result<Self, HarnessError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::config(format!("failed to read config {}: {}", path.display(), e))
        })?;
        let config: Self = serde_yaml::from_str(&raw)
            .map_err(|e| HarnessError::config(format!("failed to parse yaml: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.nodes.is_empty() {
            return Err(HarnessError::config("cluster has no nodes"));
        }
        if self.mount_point.is_empty() {
            return Err(HarnessError::config("mount_point must not be empty"));
        }
        if self.fs_spec.is_empty() {
            return Err(HarnessError::config("fs_spec must not be empty"));
        }
        Ok(())
    }

    /// The per-node path set; identical across nodes since cluster setup
    /// installs the same layout everywhere.
    pub fn node_paths(&self) -> NodePaths {
        NodePaths {
            mount_point: self.mount_point.clone(),
            romio_runtests: self.romio_runtests.clone(),
            romio_test_dir: self.romio_test_dir.clone(),
        }
    }
}
