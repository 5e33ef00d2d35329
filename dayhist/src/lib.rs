// dayhist/src/lib.rs
//! # dayhist CLI Application
//!
//! Terminal front end for `dayhist-core`: prints historic target dates,
//! computes configured sensors once, validates their sources and runs the
//! refresh schedulers with a persisted state file.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;
