//! sheetscan-test - Regression test framework for sheetscan
//!
//! Supports two modes, selected by the `REGTEST_MODE` environment
//! variable:
//!
//! - **Compare** (default): run the checks and report failures
//! - **Display**: additionally write intermediate outputs to
//!   `tests/regout` for visual inspection
//!
//! # Usage
//!
//! ```ignore
//! use sheetscan_test::RegParams;
//!
//! let mut rp = RegParams::new("codec");
//! rp.compare_values(1.0, ratio, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! The [`fixtures`] module provides the sheet layouts and answer keys the
//! regression tests share.

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // sheetscan-test is at crates/sheetscan-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
