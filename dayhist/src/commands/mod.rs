// dayhist/src/commands/mod.rs
//! Implementations of the `dayhist` subcommands.

pub mod compute;
pub mod dates;
pub mod run;
pub mod validate;
