//! Internal test modules - whitebox tests with crate access
//!
//! Scenario tests that drive the registry through the simulated host.
