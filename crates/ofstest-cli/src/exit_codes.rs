//! Unified exit codes. Part of the public contract; CI branches on these.

pub const SUCCESS: i32 = 0;
pub const TEST_FAILURES: i32 = 1; // At least one entry ran and failed
pub const CONFIG_ERROR: i32 = 2; // Bad cluster config or module registry
pub const INFRA_ERROR: i32 = 3; // Entries errored or the run was aborted
