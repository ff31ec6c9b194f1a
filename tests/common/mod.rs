//! Common test utilities for dit CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated working and home directories plus helpers to run
//!   the `dit` binary with a clean environment

#![allow(dead_code)]

pub mod env;

pub use env::*;
