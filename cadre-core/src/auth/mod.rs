/// Authentication utilities
///
/// Account management and sessions live in an external auth system; Cadre
/// only needs to know *who* is making a request so the audit trail can
/// record them.
///
/// # Modules
///
/// - [`jwt`]: HS256 token generation and validation
/// - [`middleware`]: Axum middleware extracting [`middleware::CurrentUser`]
///   from the Authorization header

pub mod jwt;
pub mod middleware;
