/// Team model and database operations
///
/// Teams are the top-level grouping in Cadre. Every project and credential
/// belongs to a team, and a team is backed by an auth group whose members
/// may manage it. Group membership itself lives in the external auth
/// system; we only store the group name.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     slug VARCHAR(32) NOT NULL UNIQUE,
///     group_name VARCHAR(255) NOT NULL,
///     status TEXT NOT NULL DEFAULT 'active',
///     created_username VARCHAR(255) NOT NULL,
///     modified_username VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL,
///     CONSTRAINT teams_status_check CHECK (status IN ('active', 'inactive'))
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use cadre_core::audit::username_on_model;
/// use cadre_core::models::team::{CreateTeam, Team, UpdateTeam};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let mut team = username_on_model::<Team, _>("alice", async {
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
/// // A later save under another user updates modified_username only.
/// username_on_model::<Team, _>("bob", async {
///     team.update(
///         &pool,
///         UpdateTeam {
///             name: Some("Platform Engineering".to_string()),
///             ..Default::default()
///         },
///     )
///     .await
/// })
/// .await?;
///
/// assert_eq!(team.created_username, "alice");
/// assert_eq!(team.modified_username, "bob");
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ModelError, RecordStatus};
use crate::audit::{scoped_username, AuditModel, MissingUsername};

/// Team model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Unique team ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Short unique identifier (e.g., "PLTF")
    pub slug: String,

    /// Name of the auth group whose members manage this team
    pub group_name: String,

    /// Lifecycle status (soft delete)
    pub status: RecordStatus,

    /// Username that created the record, stamped once at creation
    pub created_username: String,

    /// Username of the last save, stamped on every save
    pub modified_username: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    /// Display name
    pub name: String,

    /// Short unique identifier
    pub slug: String,

    /// Auth group name
    pub group_name: String,
}

/// Input for updating a team
///
/// Only non-None fields are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeam {
    /// New display name
    pub name: Option<String>,

    /// New slug
    pub slug: Option<String>,

    /// New auth group name
    pub group_name: Option<String>,
}

impl AuditModel for Team {
    const NAME: &'static str = "Team";
}

impl Team {
    /// Builds a new in-memory team, stamping both audit columns
    ///
    /// # Errors
    ///
    /// Returns [`MissingUsername`] when called outside a
    /// `username_on_model::<Team, _>` scope.
    pub fn new(data: CreateTeam) -> Result<Self, MissingUsername> {
        let username = scoped_username::<Self>()?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            name: data.name,
            slug: data.slug,
            group_name: data.group_name,
            status: RecordStatus::Active,
            created_username: username.clone(),
            modified_username: username,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an update in memory, re-stamping `modified_username`
    ///
    /// `created_username` is left untouched; it records the original
    /// creator regardless of later saves.
    ///
    /// # Errors
    ///
    /// Returns [`MissingUsername`] when called outside a scope.
    pub fn apply(&mut self, data: UpdateTeam) -> Result<(), MissingUsername> {
        self.modified_username = scoped_username::<Self>()?;

        if let Some(name) = data.name {
            self.name = name;
        }
        if let Some(slug) = data.slug {
            self.slug = slug;
        }
        if let Some(group_name) = data.group_name {
            self.group_name = group_name;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Creates a new team in the database
    ///
    /// # Errors
    ///
    /// Returns an error if no audit scope is active, the slug already
    /// exists, or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateTeam) -> Result<Self, ModelError> {
        let team = Self::new(data)?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, name, slug, group_name, status,
                               created_username, modified_username, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(&team.slug)
        .bind(&team.group_name)
        .bind(team.status)
        .bind(&team.created_username)
        .bind(&team.modified_username)
        .bind(team.created_at)
        .bind(team.updated_at)
        .execute(pool)
        .await?;

        Ok(team)
    }

    /// Finds a team by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, slug, group_name, status,
                   created_username, modified_username, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all active teams, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, slug, group_name, status,
                   created_username, modified_username, created_at, updated_at
            FROM teams
            WHERE status = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Applies an update and persists it
    ///
    /// # Errors
    ///
    /// Returns an error if no audit scope is active or the database
    /// statement fails.
    pub async fn update(&mut self, pool: &PgPool, data: UpdateTeam) -> Result<(), ModelError> {
        self.apply(data)?;
        self.persist(pool).await?;
        Ok(())
    }

    /// Soft-deletes the team
    ///
    /// Deactivation is a save like any other: it happens under the
    /// acting user's scope and re-stamps `modified_username`.
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
            UPDATE teams
            SET name = $2, slug = $3, group_name = $4, status = $5,
                modified_username = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.slug)
        .bind(&self.group_name)
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

    fn create_data() -> CreateTeam {
        CreateTeam {
            name: "team".to_string(),
            slug: "TEAM".to_string(),
            group_name: "group1".to_string(),
        }
    }

    #[test]
    fn test_new_outside_scope_fails() {
        let err = Team::new(create_data()).unwrap_err();
        assert_eq!(err.model, "Team");
        assert!(err.to_string().contains("username_on_model(Team, username)"));
    }

    #[tokio::test]
    async fn test_new_stamps_both_usernames() {
        let team = username_on_model::<Team, _>("test_user", async { Team::new(create_data()) })
            .await
            .unwrap();

        assert_eq!(team.created_username, "test_user");
        assert_eq!(team.modified_username, "test_user");
        assert_eq!(team.status, RecordStatus::Active);
    }

    #[tokio::test]
    async fn test_second_save_updates_modified_username_only() {
        let mut team = username_on_model::<Team, _>("test_user", async { Team::new(create_data()) })
            .await
            .unwrap();

        username_on_model::<Team, _>("user2", async {
            team.apply(UpdateTeam {
                name: Some("renamed".to_string()),
                ..Default::default()
            })
        })
        .await
        .unwrap();

        // modified_username always follows the latest save; created_username
        // is only stamped on first creation.
        assert_eq!(team.modified_username, "user2");
        assert_eq!(team.created_username, "test_user");
        assert_eq!(team.name, "renamed");
    }

    #[tokio::test]
    async fn test_apply_outside_scope_fails() {
        let mut team = username_on_model::<Team, _>("test_user", async { Team::new(create_data()) })
            .await
            .unwrap();

        let err = team.apply(UpdateTeam::default()).unwrap_err();
        assert_eq!(err.model, "Team");
    }

    #[tokio::test]
    async fn test_apply_keeps_unset_fields() {
        let mut team = username_on_model::<Team, _>("test_user", async { Team::new(create_data()) })
            .await
            .unwrap();

        username_on_model::<Team, _>("user2", async {
            team.apply(UpdateTeam {
                slug: Some("NEW".to_string()),
                ..Default::default()
            })
        })
        .await
        .unwrap();

        assert_eq!(team.slug, "NEW");
        assert_eq!(team.name, "team");
        assert_eq!(team.group_name, "group1");
    }
}
