use thiserror::Error;

/// Harness-level errors.
///
/// Test failure is never an error: a command exiting non-zero is data and
/// travels through `EntryOutcome::Exit`. These variants cover the cases an
/// entry cannot classify itself, which the scheduler downgrades to an
/// `Error` status for that entry and keeps going. Only
/// [`HarnessError::ClusterUnreachable`] aborts the run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("config error: {0}")]
    Config(String),

    #[error("node {node} unreachable: {detail}")]
    NodeUnreachable { node: String, detail: String },

    #[error("failed to spawn command on {node}: {source}")]
    CommandSpawn {
        node: String,
        #[source]
        source: std::io::Error,
    },

    #[error("mount failed: {0}")]
    Mount(String),

    #[error("entry timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("cluster unreachable: {0}")]
    ClusterUnreachable(String),
}

impl HarnessError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }

    /// Fatal errors make continuing the run meaningless; everything else is
    /// recorded against the current entry and the run proceeds.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ClusterUnreachable(_))
    }
}
