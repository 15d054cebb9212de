//! zfr: command-line client for Zephyr Scale folders and test plans.
//!
//! Layers, leaf first:
//! - [`domain`]: entities, request payloads, input validation
//! - [`config`]: credential resolution from flags, environment and config file
//! - [`application`]: authenticated API client and resource services
//! - [`infrastructure`]: HTTP transport and service wiring
//! - [`cli`]: argument parsing, dispatch, output and exit codes

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
