#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Shared utilities for webenv.
//!
//! This crate provides pure helper functions with no logging/tracing dependencies.
//! Logging is handled by the CLI crate and the core library.

pub mod fs;
pub mod slash;

pub use fs::{normalize_lexically, read_to_string_lossy, resolve_path};
pub use slash::ensure_slash;
