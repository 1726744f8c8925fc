/// Credential secret model and database operations
///
/// Key/value secret material stored under a credential. The value is
/// opaque to Cadre; encryption at rest is the database's concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ModelError, RecordStatus};
use crate::audit::{scoped_username, AuditModel, MissingUsername};

/// Credential secret model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CredentialSecret {
    /// Unique secret ID (UUID v4)
    pub id: Uuid,

    /// Owning credential
    pub credential_id: Uuid,

    /// Secret key (e.g., "access_key"), unique within the credential
    pub key: String,

    /// Secret value
    pub value: String,

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

/// Input for creating a credential secret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCredentialSecret {
    /// Owning credential
    pub credential_id: Uuid,

    /// Secret key
    pub key: String,

    /// Secret value
    pub value: String,
}

/// Input for updating a credential secret
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCredentialSecret {
    /// New secret value
    pub value: Option<String>,
}

impl AuditModel for CredentialSecret {
    const NAME: &'static str = "CredentialSecret";
}

impl CredentialSecret {
    /// Builds a new in-memory secret, stamping both audit columns
    pub fn new(data: CreateCredentialSecret) -> Result<Self, MissingUsername> {
        let username = scoped_username::<Self>()?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            credential_id: data.credential_id,
            key: data.key,
            value: data.value,
            status: RecordStatus::Active,
            created_username: username.clone(),
            modified_username: username,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an update in memory, re-stamping `modified_username`
    pub fn apply(&mut self, data: UpdateCredentialSecret) -> Result<(), MissingUsername> {
        self.modified_username = scoped_username::<Self>()?;

        if let Some(value) = data.value {
            self.value = value;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Creates a new secret in the database
    pub async fn create(pool: &PgPool, data: CreateCredentialSecret) -> Result<Self, ModelError> {
        let secret = Self::new(data)?;

        sqlx::query(
            r#"
            INSERT INTO credential_secrets (id, credential_id, key, value, status,
                                            created_username, modified_username, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(secret.id)
        .bind(secret.credential_id)
        .bind(&secret.key)
        .bind(&secret.value)
        .bind(secret.status)
        .bind(&secret.created_username)
        .bind(&secret.modified_username)
        .bind(secret.created_at)
        .bind(secret.updated_at)
        .execute(pool)
        .await?;

        Ok(secret)
    }

    /// Finds a secret by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CredentialSecret>(
            r#"
            SELECT id, credential_id, key, value, status,
                   created_username, modified_username, created_at, updated_at
            FROM credential_secrets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists the active secrets of a credential, ordered by key
    pub async fn list_for_credential(
        pool: &PgPool,
        credential_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, CredentialSecret>(
            r#"
            SELECT id, credential_id, key, value, status,
                   created_username, modified_username, created_at, updated_at
            FROM credential_secrets
            WHERE credential_id = $1 AND status = 'active'
            ORDER BY key
            "#,
        )
        .bind(credential_id)
        .fetch_all(pool)
        .await
    }

    /// Applies an update and persists it
    pub async fn update(
        &mut self,
        pool: &PgPool,
        data: UpdateCredentialSecret,
    ) -> Result<(), ModelError> {
        self.apply(data)?;
        self.persist(pool).await?;
        Ok(())
    }

    /// Soft-deletes the secret
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
            UPDATE credential_secrets
            SET value = $2, status = $3, modified_username = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(self.id)
        .bind(&self.value)
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

    #[tokio::test]
    async fn test_value_rotation_keeps_creator() {
        let mut secret = username_on_model::<CredentialSecret, _>("test_user", async {
            CredentialSecret::new(CreateCredentialSecret {
                credential_id: Uuid::new_v4(),
                key: "access_key".to_string(),
                value: "supersecret".to_string(),
            })
        })
        .await
        .unwrap();

        username_on_model::<CredentialSecret, _>("rotator", async {
            secret.apply(UpdateCredentialSecret {
                value: Some("rotated".to_string()),
            })
        })
        .await
        .unwrap();

        assert_eq!(secret.value, "rotated");
        assert_eq!(secret.created_username, "test_user");
        assert_eq!(secret.modified_username, "rotator");
    }
}
