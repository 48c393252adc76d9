//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters. All tests run on the host with no serial
//! hardware required.

mod console_tests;
mod listener_tests;
mod mock_link;
