//! # ttracker API Server Library
//!
//! REST API over projects, tasks and teams, authenticated with access
//! tokens from an external identity provider.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Extractors with JSON error rejections
//! - `middleware`: Authentication middleware
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
