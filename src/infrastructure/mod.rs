//! Infrastructure layer for filesystem and environment interactions.
//!
//! Utilities for the Zellij plugin sandbox, where the host filesystem is
//! mounted under `/host`.

pub mod paths;

pub use paths::{command_relative, data_dir, expand_tilde};
