//! Shared test utilities for reportgen integration tests.
//!
//! - `TestHarness`: temp output directory plus a mock ClickHouse endpoint
//! - Builders for ticket records and configurations

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
