//! Core engine for the OFSTest conformance harness.
//!
//! Test suites are declared as [`model::TestModule`] values: immutable
//! metadata plus an ordered list of entries, each a small capability that
//! runs commands on a cluster node and yields an exit outcome. The
//! [`engine::scheduler::Scheduler`] iterates modules, honors their mount
//! prerequisites, and reduces captured output and exit codes to per-entry
//! verdicts.

pub mod config;
pub mod engine;
pub mod errors;
pub mod model;
pub mod modules;
pub mod network;
pub mod node;
pub mod report;
