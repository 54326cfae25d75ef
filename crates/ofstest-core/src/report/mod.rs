pub mod console;
pub mod json;

use serde::{Deserialize, Serialize};

use crate::model::{RunSummary, TestStatus};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: TestStatus) {
        match status {
            TestStatus::Pass => self.passed += 1,
            TestStatus::Fail => self.failed += 1,
            TestStatus::Error => self.errored += 1,
            TestStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored + self.skipped
    }
}

pub fn counts(summaries: &[RunSummary]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for summary in summaries {
        for result in &summary.results {
            counts.add(result.status);
        }
    }
    counts
}
