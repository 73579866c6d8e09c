/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint (public)
/// - `projects`: Project CRUD for the authenticated caller
/// - `tasks`: Task CRUD within one of the caller's projects
/// - `teams`: Team lookup and creation
/// - `users`: User creation placeholder

pub mod health;
pub mod projects;
pub mod tasks;
pub mod teams;
pub mod users;
