/// Project model and database operations
///
/// Projects group applications under a team.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY,
///     team_id UUID NOT NULL REFERENCES teams(id),
///     name VARCHAR(255) NOT NULL,
///     slug VARCHAR(32) NOT NULL,
///     status TEXT NOT NULL DEFAULT 'active',
///     created_username VARCHAR(255) NOT NULL,
///     modified_username VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL,
///     CONSTRAINT projects_status_check CHECK (status IN ('active', 'inactive'))
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ModelError, RecordStatus};
use crate::audit::{scoped_username, AuditModel, MissingUsername};

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Owning team
    pub team_id: Uuid,

    /// Display name
    pub name: String,

    /// Short identifier (e.g., "PRJD")
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

/// Input for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Owning team
    pub team_id: Uuid,

    /// Display name
    pub name: String,

    /// Short identifier
    pub slug: String,
}

/// Input for updating a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New display name
    pub name: Option<String>,

    /// New slug
    pub slug: Option<String>,

    /// Move the project to another team
    pub team_id: Option<Uuid>,
}

impl AuditModel for Project {
    const NAME: &'static str = "Project";
}

impl Project {
    /// Builds a new in-memory project, stamping both audit columns
    pub fn new(data: CreateProject) -> Result<Self, MissingUsername> {
        let username = scoped_username::<Self>()?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            team_id: data.team_id,
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
    pub fn apply(&mut self, data: UpdateProject) -> Result<(), MissingUsername> {
        self.modified_username = scoped_username::<Self>()?;

        if let Some(name) = data.name {
            self.name = name;
        }
        if let Some(slug) = data.slug {
            self.slug = slug;
        }
        if let Some(team_id) = data.team_id {
            self.team_id = team_id;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Creates a new project in the database
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, ModelError> {
        let project = Self::new(data)?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, team_id, name, slug, status,
                                  created_username, modified_username, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(project.id)
        .bind(project.team_id)
        .bind(&project.name)
        .bind(&project.slug)
        .bind(project.status)
        .bind(&project.created_username)
        .bind(&project.modified_username)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, team_id, name, slug, status,
                   created_username, modified_username, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists the active projects of a team, newest first
    pub async fn list_for_team(pool: &PgPool, team_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, team_id, name, slug, status,
                   created_username, modified_username, created_at, updated_at
            FROM projects
            WHERE team_id = $1 AND status = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await
    }

    /// Applies an update and persists it
    pub async fn update(&mut self, pool: &PgPool, data: UpdateProject) -> Result<(), ModelError> {
        self.apply(data)?;
        self.persist(pool).await?;
        Ok(())
    }

    /// Soft-deletes the project
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
            UPDATE projects
            SET team_id = $2, name = $3, slug = $4, status = $5,
                modified_username = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(self.id)
        .bind(self.team_id)
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
