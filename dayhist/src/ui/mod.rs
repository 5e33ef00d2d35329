// dayhist/src/ui/mod.rs
//! Terminal output: status messages, colors and result tables.

pub mod output_format;
pub mod table;
pub mod theme;
