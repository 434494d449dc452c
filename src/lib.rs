//! Declarative management of macOS configuration profiles.
//!
//! A catalog declares which profiles should be installed, for the whole
//! device or for one user, and the engine converges the host to match by
//! driving the `profiles` command.
//!
//! The public API is organised into these layers:
//!
//! - **[`resources`]**: the `config_profile` resource type, its validation,
//!   autorequire rules and providers
//! - **[`catalog`]**: parse and validate the TOML catalog
//! - **[`relationships`]**: ordering edges between profiles and the resources
//!   they depend on
//! - **[`commands`]**: top-level subcommand orchestration (`apply`, `refresh`, `check`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod error;
pub mod exec;
pub mod logging;
pub mod relationships;
pub mod resources;
