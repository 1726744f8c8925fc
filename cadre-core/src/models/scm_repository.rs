/// SCM repository model and database operations
///
/// A repository on an SCM service, addressed by organisation and name,
/// together with the credential used to access it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ModelError, RecordStatus};
use crate::audit::{scoped_username, AuditModel, MissingUsername};

/// SCM repository model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScmRepository {
    /// Unique repository ID (UUID v4)
    pub id: Uuid,

    /// Service the repository lives on
    pub scm_service_id: Uuid,

    /// Credential used to access the repository
    pub credential_id: Uuid,

    /// Organisation / namespace on the service (e.g., "acme")
    pub organisation: String,

    /// Repository name within the organisation
    pub repository_name: String,

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

/// Input for creating an SCM repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScmRepository {
    /// Service the repository lives on
    pub scm_service_id: Uuid,

    /// Credential used to access the repository
    pub credential_id: Uuid,

    /// Organisation / namespace
    pub organisation: String,

    /// Repository name
    pub repository_name: String,
}

/// Input for updating an SCM repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateScmRepository {
    /// New organisation
    pub organisation: Option<String>,

    /// New repository name
    pub repository_name: Option<String>,

    /// Switch to another credential
    pub credential_id: Option<Uuid>,
}

impl AuditModel for ScmRepository {
    const NAME: &'static str = "ScmRepository";
}

impl ScmRepository {
    /// Builds a new in-memory repository, stamping both audit columns
    pub fn new(data: CreateScmRepository) -> Result<Self, MissingUsername> {
        let username = scoped_username::<Self>()?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            scm_service_id: data.scm_service_id,
            credential_id: data.credential_id,
            organisation: data.organisation,
            repository_name: data.repository_name,
            status: RecordStatus::Active,
            created_username: username.clone(),
            modified_username: username,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an update in memory, re-stamping `modified_username`
    pub fn apply(&mut self, data: UpdateScmRepository) -> Result<(), MissingUsername> {
        self.modified_username = scoped_username::<Self>()?;

        if let Some(organisation) = data.organisation {
            self.organisation = organisation;
        }
        if let Some(repository_name) = data.repository_name {
            self.repository_name = repository_name;
        }
        if let Some(credential_id) = data.credential_id {
            self.credential_id = credential_id;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Creates a new repository in the database
    pub async fn create(pool: &PgPool, data: CreateScmRepository) -> Result<Self, ModelError> {
        let repository = Self::new(data)?;

        sqlx::query(
            r#"
            INSERT INTO scm_repositories (id, scm_service_id, credential_id, organisation,
                                          repository_name, status, created_username,
                                          modified_username, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(repository.id)
        .bind(repository.scm_service_id)
        .bind(repository.credential_id)
        .bind(&repository.organisation)
        .bind(&repository.repository_name)
        .bind(repository.status)
        .bind(&repository.created_username)
        .bind(&repository.modified_username)
        .bind(repository.created_at)
        .bind(repository.updated_at)
        .execute(pool)
        .await?;

        Ok(repository)
    }

    /// Finds a repository by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ScmRepository>(
            r#"
            SELECT id, scm_service_id, credential_id, organisation, repository_name, status,
                   created_username, modified_username, created_at, updated_at
            FROM scm_repositories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists the active repositories of a service, ordered by organisation and name
    pub async fn list_for_service(
        pool: &PgPool,
        scm_service_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ScmRepository>(
            r#"
            SELECT id, scm_service_id, credential_id, organisation, repository_name, status,
                   created_username, modified_username, created_at, updated_at
            FROM scm_repositories
            WHERE scm_service_id = $1 AND status = 'active'
            ORDER BY organisation, repository_name
            "#,
        )
        .bind(scm_service_id)
        .fetch_all(pool)
        .await
    }

    /// Applies an update and persists it
    pub async fn update(
        &mut self,
        pool: &PgPool,
        data: UpdateScmRepository,
    ) -> Result<(), ModelError> {
        self.apply(data)?;
        self.persist(pool).await?;
        Ok(())
    }

    /// Soft-deletes the repository
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
            UPDATE scm_repositories
            SET scm_service_id = $2, credential_id = $3, organisation = $4,
                repository_name = $5, status = $6, modified_username = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(self.id)
        .bind(self.scm_service_id)
        .bind(self.credential_id)
        .bind(&self.organisation)
        .bind(&self.repository_name)
        .bind(self.status)
        .bind(&self.modified_username)
        .bind(self.updated_at)
        .execute(pool)
        .await?;

        Ok(())
    }
}
