//! Shared mock-server plumbing for the sticker-dl integration tests
//!
//! Each test binary uses a different subset of these helpers.
#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod config;
pub mod fixtures;

pub use assertions::{assert_no_partial_files, directories_under, files_under};
pub use config::*;
pub use fixtures::*;
