//! Declarative dotfile management driven by mapping files.
//!
//! A repository holds one directory per *module*; each module contains a
//! mapping file listing `source  target  [pattern]` entries. dotman deploys
//! those files to their targets, imports them back, and reports drift.
//!
//! The public API is organised into layers:
//!
//! - **[`mapping`]**: parse mapping files and expand them into instructions
//! - **[`modules`]**: discover the modules of a repository
//! - **[`resources`]**: idempotent `check + apply` copy primitive
//! - **[`changes`]**: lazy detection of targets that differ from their source
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod changes;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod modules;
pub mod operations;
pub mod resources;
