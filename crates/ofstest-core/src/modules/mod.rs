//! Registry of built-in test modules.

pub mod mpiio;

use async_trait::async_trait;

use crate::errors::HarnessError;
use crate::model::{EntryOutcome, TestEntry, TestModule};
use crate::network::Network;
use crate::node::Node;

/// A declared-but-unported test. Runs nothing and reports
/// [`EntryOutcome::NotImplemented`] so the summary counts it as skipped
/// instead of silently treating a no-op as a pass.
pub struct NotImplementedEntry {
    name: &'static str,
}

impl NotImplementedEntry {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl TestEntry for NotImplementedEntry {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(
        &self,
        _node: &dyn Node,
        _network: &dyn Network,
        _output: &mut Vec<String>,
    ) -> Result<EntryOutcome, HarnessError> {
        Ok(EntryOutcome::NotImplemented)
    }
}

/// All registered modules, in scheduling order.
pub fn builtin() -> Result<Vec<TestModule>, HarnessError> {
    Ok(vec![mpiio::module()?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_modules_are_wellformed() {
        let modules = builtin().expect("registry");
        assert!(!modules.is_empty());
        for module in &modules {
            assert!(!module.entries().is_empty());
            assert!(!module.config.prefix.is_empty());
        }
    }
}
