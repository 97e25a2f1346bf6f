//! tasklist: a small task-list REST API.
//!
//! The HTTP layer ([`api`]) is generic over [`storage::TaskStore`]; the binary
//! picks the in-memory or MongoDB strategy at startup from configuration.

pub mod api;
pub mod check;
pub mod cli;
pub mod error;
pub mod model;
pub mod storage;
