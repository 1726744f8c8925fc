/// SCM service model and database operations
///
/// An SCM service is a source-control server (bitbucket, github, gitlab)
/// that repositories live on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ModelError, RecordStatus};
use crate::audit::{scoped_username, AuditModel, MissingUsername};

/// SCM service model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScmService {
    /// Unique service ID (UUID v4)
    pub id: Uuid,

    /// Service kind (e.g., "bitbucket", "github", "gitlab")
    pub scm_service_type: String,

    /// Base URL of the server
    pub server_url: String,

    /// Lifecycle status (soft delete)
    pub status: RecordStatus,

    /// Username that created the record
    pub created_username: String,

    /// Username of the last save
    pub modified_username: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an SCM service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScmService {
    /// Service kind
    pub scm_service_type: String,

    /// Base URL of the server
    pub server_url: String,
}

/// Input for updating an SCM service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateScmService {
    /// New service kind
    pub scm_service_type: Option<String>,

    /// New base URL
    pub server_url: Option<String>,
}

impl AuditModel for ScmService {
    const NAME: &'static str = "ScmService";
}

impl ScmService {
    /// Builds a new in-memory service, stamping both audit columns
    pub fn new(data: CreateScmService) -> Result<Self, MissingUsername> {
        let username = scoped_username::<Self>()?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            scm_service_type: data.scm_service_type,
            server_url: data.server_url,
            status: RecordStatus::Active,
            created_username: username.clone(),
            modified_username: username,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an update in memory, re-stamping `modified_username`
    pub fn apply(&mut self, data: UpdateScmService) -> Result<(), MissingUsername> {
        self.modified_username = scoped_username::<Self>()?;

        if let Some(scm_service_type) = data.scm_service_type {
            self.scm_service_type = scm_service_type;
        }
        if let Some(server_url) = data.server_url {
            self.server_url = server_url;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Creates a new service in the database
    pub async fn create(pool: &PgPool, data: CreateScmService) -> Result<Self, ModelError> {
        let service = Self::new(data)?;

        sqlx::query(
            r#"
            INSERT INTO scm_services (id, scm_service_type, server_url, status,
                                      created_username, modified_username, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(service.id)
        .bind(&service.scm_service_type)
        .bind(&service.server_url)
        .bind(service.status)
        .bind(&service.created_username)
        .bind(&service.modified_username)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(pool)
        .await?;

        Ok(service)
    }

    /// Finds a service by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ScmService>(
            r#"
            SELECT id, scm_service_type, server_url, status,
                   created_username, modified_username, created_at, updated_at
            FROM scm_services
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all active services, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ScmService>(
            r#"
            SELECT id, scm_service_type, server_url, status,
                   created_username, modified_username, created_at, updated_at
            FROM scm_services
            WHERE status = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Applies an update and persists it
    pub async fn update(&mut self, pool: &PgPool, data: UpdateScmService) -> Result<(), ModelError> {
        self.apply(data)?;
        self.persist(pool).await?;
        Ok(())
    }

    /// Soft-deletes the service
    pub async fn deactivate(&mut self, pool: &PgPool) -> Result<(), ModelError> {
        self.modified_username = scoped_username::<Self>()?;
        self.status = RecordStatus::Inactive;
        self.updated_at = Utc::now();
        self.persist(pool).await?;
        Ok(())
    }

    async fn persist(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE scm_services
            SET scm_service_type = $2, server_url = $3, status = $4,
                modified_username = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(self.id)
        .bind(&self.scm_service_type)
        .bind(&self.server_url)
        .bind(self.status)
        .bind(&self.modified_username)
        .bind(self.updated_at)
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::username_on_model;

    #[test]
    fn test_new_outside_scope_names_model() {
        let err = ScmService::new(CreateScmService {
            scm_service_type: "bitbucket".to_string(),
            server_url: "www.example.com".to_string(),
        })
        .unwrap_err();

        assert!(err
            .to_string()
            .contains("username_on_model(ScmService, username)"));
    }

    #[tokio::test]
    async fn test_new_stamps_scoped_username() {
        let service = username_on_model::<ScmService, _>("audit_user", async {
            ScmService::new(CreateScmService {
                scm_service_type: "git".to_string(),
                server_url: "www.example.com".to_string(),
            })
        })
        .await
        .unwrap();

        assert_eq!(service.created_username, "audit_user");
        assert_eq!(service.modified_username, "audit_user");
    }
}
