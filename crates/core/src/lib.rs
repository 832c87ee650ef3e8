//! Core types and utilities for pkgfs.
//!
//! This crate holds the pieces every pkgfs component leans on:
//!
//! - [`Error`] and [`Result`], the error taxonomy surfaced to callers
//! - [`Config`], the read-only tool configuration
//! - [`fs`], the filesystem façade (absolutization, directory tests, deletion)
//! - [`shell`], quoting and cwd-scoped command construction
//! - [`paths`], basename/dirname splitting for paths and URLs

pub mod config;
mod error;
pub mod fs;
pub mod paths;
pub mod shell;

pub use config::Config;
pub use error::{Error, Result};
