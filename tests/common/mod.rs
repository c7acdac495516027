//! Common test infrastructure for the harness's integration tests:
//! a temp-directory test harness and a logger that dumps its entries
//! when a test panics.

pub mod harness;
pub mod logging;

#[allow(unused_imports)]
pub use harness::TestHarness;
