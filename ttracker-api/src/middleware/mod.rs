/// Middleware modules for the API server
///
/// - `auth`: Bearer token authentication for every resource route

pub mod auth;
