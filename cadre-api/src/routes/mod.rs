/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `teams`: Team CRUD
/// - `projects`: Project CRUD
/// - `applications`: Application CRUD
/// - `credentials`: Credential and credential secret CRUD
/// - `scm`: SCM service and repository CRUD

pub mod applications;
pub mod credentials;
pub mod health;
pub mod projects;
pub mod scm;
pub mod teams;
