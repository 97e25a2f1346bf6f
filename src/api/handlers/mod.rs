//! API handlers

pub mod tasks;
pub mod version;
