/// Application model and database operations
///
/// An application is a deployable unit: it belongs to a project and points
/// at the SCM repository holding its source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ModelError, RecordStatus};
use crate::audit::{scoped_username, AuditModel, MissingUsername};

/// Application model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Application {
    /// Unique application ID (UUID v4)
    pub id: Uuid,

    /// Owning project
    pub project_id: Uuid,

    /// Source repository
    pub scm_repository_id: Uuid,

    /// Display name
    pub name: String,

    /// Short identifier (e.g., "APPD")
    pub slug: String,

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

/// Input for creating an application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplication {
    /// Owning project
    pub project_id: Uuid,

    /// Source repository
    pub scm_repository_id: Uuid,

    /// Display name
    pub name: String,

    /// Short identifier
    pub slug: String,
}

/// Input for updating an application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateApplication {
    /// New display name
    pub name: Option<String>,

    /// New slug
    pub slug: Option<String>,

    /// Point the application at another repository
    pub scm_repository_id: Option<Uuid>,
}

impl AuditModel for Application {
    const NAME: &'static str = "Application";
}

impl Application {
    /// Builds a new in-memory application, stamping both audit columns
    pub fn new(data: CreateApplication) -> Result<Self, MissingUsername> {
        let username = scoped_username::<Self>()?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            project_id: data.project_id,
            scm_repository_id: data.scm_repository_id,
            name: data.name,
            slug: data.slug,
            status: RecordStatus::Active,
            created_username: username.clone(),
            modified_username: username,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an update in memory, re-stamping `modified_username`
    pub fn apply(&mut self, data: UpdateApplication) -> Result<(), MissingUsername> {
        self.modified_username = scoped_username::<Self>()?;

        if let Some(name) = data.name {
            self.name = name;
        }
        if let Some(slug) = data.slug {
            self.slug = slug;
        }
        if let Some(scm_repository_id) = data.scm_repository_id {
            self.scm_repository_id = scm_repository_id;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Creates a new application in the database
    pub async fn create(pool: &PgPool, data: CreateApplication) -> Result<Self, ModelError> {
        let application = Self::new(data)?;

        sqlx::query(
            r#"
            INSERT INTO applications (id, project_id, scm_repository_id, name, slug, status,
                                      created_username, modified_username, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(application.id)
        .bind(application.project_id)
        .bind(application.scm_repository_id)
        .bind(&application.name)
        .bind(&application.slug)
        .bind(application.status)
        .bind(&application.created_username)
        .bind(&application.modified_username)
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(pool)
        .await?;

        Ok(application)
    }

    /// Finds an application by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT id, project_id, scm_repository_id, name, slug, status,
                   created_username, modified_username, created_at, updated_at
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists the active applications of a project, newest first
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT id, project_id, scm_repository_id, name, slug, status,
                   created_username, modified_username, created_at, updated_at
            FROM applications
            WHERE project_id = $1 AND status = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Applies an update and persists it
    pub async fn update(
        &mut self,
        pool: &PgPool,
        data: UpdateApplication,
    ) -> Result<(), ModelError> {
        self.apply(data)?;
        self.persist(pool).await?;
        Ok(())
    }

    /// Soft-deletes the application
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
            UPDATE applications
            SET project_id = $2, scm_repository_id = $3, name = $4, slug = $5, status = $6,
                modified_username = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(self.id)
        .bind(self.project_id)
        .bind(self.scm_repository_id)
        .bind(&self.name)
        .bind(&self.slug)
        .bind(self.status)
        .bind(&self.modified_username)
        .bind(self.updated_at)
        .execute(pool)
        .await?;

        Ok(())
    }
}
