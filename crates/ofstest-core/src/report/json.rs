//! Machine-readable run summary for downstream consumption.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::RunSummary;
use crate::report::{counts, StatusCounts};

/// Bumped on any incompatible change to the envelope below.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub counts: StatusCounts,
    pub modules: Vec<RunSummary>,
}

impl JsonSummary {
    pub fn new(modules: Vec<RunSummary>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            counts: counts(&modules),
            modules,
        }
    }
}

pub fn write<W: Write>(mut writer: W, summary: &JsonSummary) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    Ok(())
}
