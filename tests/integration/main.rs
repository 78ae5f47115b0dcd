//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a subsystem through the
//! public API against mock adapters. No keychain, radio or native library
//! is required.

mod bridge_tests;
mod provisioning_tests;
