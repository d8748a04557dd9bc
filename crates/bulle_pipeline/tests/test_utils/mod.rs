//! Test utilities for pipeline tests.
//!
//! This module provides a scripted generation backend.

pub mod mock_driver;

#[allow(unused_imports)]
pub use mock_driver::{MockDriver, MockResponse};
