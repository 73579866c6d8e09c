//! # ttracker Shared Library
//!
//! Domain types, persistence and authentication used by the ttracker API
//! server.
//!
//! ## Module Organization
//!
//! - `models`: Users, projects, tasks and teams
//! - `storage`: Capability traits plus PostgreSQL and in-memory adapters
//! - `services`: Input normalization and validation over storage
//! - `auth`: Provider key set cache, token verification, authenticator
//! - `db`: Connection pool and schema bootstrap

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod storage;

/// Current version of the ttracker shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
