/// Credential model and database operations
///
/// A credential is a named handle owned by a team; the actual secret
/// material lives in [`super::credential_secret`] records underneath it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ModelError, RecordStatus};
use crate::audit::{scoped_username, AuditModel, MissingUsername};

/// Credential model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Credential {
    /// Unique credential ID (UUID v4)
    pub id: Uuid,

    /// Owning team
    pub team_id: Uuid,

    /// Display name
    pub name: String,

    /// Short identifier (e.g., "CRED")
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

/// Input for creating a credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCredential {
    /// Owning team
    pub team_id: Uuid,

    /// Display name
    pub name: String,

    /// Short identifier
    pub slug: String,
}

/// Input for updating a credential
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCredential {
    /// New display name
    pub name: Option<String>,

    /// New slug
    pub slug: Option<String>,
}

impl AuditModel for Credential {
    const NAME: &'static str = "Credential";
}

impl Credential {
    /// Builds a new in-memory credential, stamping both audit columns
    pub fn new(data: CreateCredential) -> Result<Self, MissingUsername> {
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
    pub fn apply(&mut self, data: UpdateCredential) -> Result<(), MissingUsername> {
        self.modified_username = scoped_username::<Self>()?;

        if let Some(name) = data.name {
            self.name = name;
        }
        if let Some(slug) = data.slug {
            self.slug = slug;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Creates a new credential in the database
    pub async fn create(pool: &PgPool, data: CreateCredential) -> Result<Self, ModelError> {
        let credential = Self::new(data)?;

        sqlx::query(
            r#"
            INSERT INTO credentials (id, team_id, name, slug, status,
                                     created_username, modified_username, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(credential.id)
        .bind(credential.team_id)
        .bind(&credential.name)
        .bind(&credential.slug)
        .bind(credential.status)
        .bind(&credential.created_username)
        .bind(&credential.modified_username)
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(pool)
        .await?;

        Ok(credential)
    }

    /// Finds a credential by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Credential>(
            r#"
            SELECT id, team_id, name, slug, status,
                   created_username, modified_username, created_at, updated_at
            FROM credentials
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists the active credentials of a team, newest first
    pub async fn list_for_team(pool: &PgPool, team_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Credential>(
            r#"
            SELECT id, team_id, name, slug, status,
                   created_username, modified_username, created_at, updated_at
            FROM credentials
            WHERE team_id = $1 AND status = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await
    }

    /// Applies an update and persists it
    pub async fn update(&mut self, pool: &PgPool, data: UpdateCredential) -> Result<(), ModelError> {
        self.apply(data)?;
        self.persist(pool).await?;
        Ok(())
    }

    /// Soft-deletes the credential
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
            UPDATE credentials
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
