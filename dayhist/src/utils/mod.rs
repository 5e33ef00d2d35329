// dayhist/src/utils/mod.rs
pub mod app_state;
pub mod publisher;
