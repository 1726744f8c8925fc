/// Database models for Cadre
///
/// This module contains all database models and their CRUD operations.
/// Every model carries `created_username` / `modified_username` audit
/// columns stamped via the [`crate::audit`] scope mechanism: constructing
/// or mutating a record outside `username_on_model` fails with
/// [`crate::audit::MissingUsername`].
///
/// # Models
///
/// - `team`: Teams, the top-level grouping (backed by an auth group)
/// - `project`: Projects owned by a team
/// - `application`: Deployable applications, tied to a project and an SCM repository
/// - `credential`: Named credentials owned by a team
/// - `credential_secret`: Key/value secrets under a credential
/// - `scm_service`: SCM server definitions (bitbucket, github, ...)
/// - `scm_repository`: Repositories on an SCM service
///
/// # Example
///
/// ```no_run
/// use cadre_core::audit::username_on_model;
/// use cadre_core::models::team::{CreateTeam, Team};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let team = username_on_model::<Team, _>("alice", async {
///     Team::create(
///         &pool,
///         CreateTeam {
///             name: "Platform".to_string(),
///             slug: "PLTF".to_string(),
///             group_name: "platform-admins".to_string(),
///         },
///     )
///     .await
/// })
/// .await?;
///
/// assert_eq!(team.created_username, "alice");
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};

use crate::audit::MissingUsername;

pub mod application;
pub mod credential;
pub mod credential_secret;
pub mod project;
pub mod scm_repository;
pub mod scm_service;
pub mod team;

/// Lifecycle status of a record
///
/// Deletion is soft everywhere: records are marked `Inactive` and kept
/// for the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Record is live
    Active,

    /// Record has been soft-deleted
    Inactive,
}

/// Error type for model save operations
///
/// Saves can fail either because no audit scope is active or because the
/// database rejected the statement.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Save attempted outside a `username_on_model` scope
    #[error(transparent)]
    MissingUsername(#[from] MissingUsername),

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RecordStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&RecordStatus::Inactive).unwrap(),
            "\"inactive\""
        );
    }
}
