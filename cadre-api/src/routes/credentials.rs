/// Credential and credential secret endpoints
///
/// # Endpoints
///
/// - `POST /v1/credentials` - Create credential
/// - `GET /v1/credentials?team=<uuid>` - List a team's active credentials
/// - `GET /v1/credentials/:id` - Get credential
/// - `PUT /v1/credentials/:id` - Update credential
/// - `DELETE /v1/credentials/:id` - Deactivate credential
/// - `POST /v1/credentials/:id/secrets` - Add secret under a credential
/// - `GET /v1/credentials/:id/secrets` - List a credential's active secrets
/// - `PUT /v1/secrets/:id` - Rotate a secret value
/// - `DELETE /v1/secrets/:id` - Deactivate secret

use crate::{
    admin,
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use cadre_core::auth::middleware::CurrentUser;
use cadre_core::models::credential::{CreateCredential, Credential, UpdateCredential};
use cadre_core::models::credential_secret::{
    CreateCredentialSecret, CredentialSecret, UpdateCredentialSecret,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create credential request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCredentialRequest {
    /// Owning team
    pub team_id: Uuid,

    /// Credential name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Short identifier
    #[validate(length(min = 1, max = 32, message = "Slug must be 1-32 characters"))]
    pub slug: String,
}

/// Update credential request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCredentialRequest {
    /// New credential name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New slug
    #[validate(length(min = 1, max = 32, message = "Slug must be 1-32 characters"))]
    pub slug: Option<String>,
}

/// Create credential secret request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSecretRequest {
    /// Secret key (unique within the credential)
    #[validate(length(min = 1, max = 255, message = "Key must be 1-255 characters"))]
    pub key: String,

    /// Secret value
    #[validate(length(min = 1, message = "Value must not be empty"))]
    pub value: String,
}

/// Update credential secret request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSecretRequest {
    /// New secret value
    #[validate(length(min = 1, message = "Value must not be empty"))]
    pub value: String,
}

/// Query parameters for listing credentials
#[derive(Debug, Deserialize)]
pub struct ListCredentialsQuery {
    /// Team to list credentials for
    pub team: Uuid,
}

/// Builds the credential and secret routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/credentials", post(create_credential).get(list_credentials))
        .route(
            "/credentials/:id",
            get(get_credential)
                .put(update_credential)
                .delete(delete_credential),
        )
        .route(
            "/credentials/:id/secrets",
            post(create_secret).get(list_secrets),
        )
        .route("/secrets/:id", put(update_secret).delete(delete_secret))
}

/// Creates a credential
pub async fn create_credential(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateCredentialRequest>,
) -> ApiResult<(StatusCode, Json<Credential>)> {
    req.validate()?;

    let credential = admin::save_model::<Credential, _>(
        &user,
        Credential::create(
            &state.db,
            CreateCredential {
                team_id: req.team_id,
                name: req.name,
                slug: req.slug,
            },
        ),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(credential)))
}

/// Lists a team's active credentials
pub async fn list_credentials(
    State(state): State<AppState>,
    Query(query): Query<ListCredentialsQuery>,
) -> ApiResult<Json<Vec<Credential>>> {
    let credentials = Credential::list_for_team(&state.db, query.team).await?;
    Ok(Json(credentials))
}

/// Gets a credential by ID
pub async fn get_credential(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Credential>> {
    let credential = Credential::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Credential not found".to_string()))?;

    Ok(Json(credential))
}

/// Updates a credential
pub async fn update_credential(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCredentialRequest>,
) -> ApiResult<Json<Credential>> {
    req.validate()?;

    let mut credential = Credential::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Credential not found".to_string()))?;

    admin::save_model::<Credential, _>(
        &user,
        credential.update(
            &state.db,
            UpdateCredential {
                name: req.name,
                slug: req.slug,
            },
        ),
    )
    .await?;

    Ok(Json(credential))
}

/// Deactivates (soft-deletes) a credential
pub async fn delete_credential(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut credential = Credential::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Credential not found".to_string()))?;

    admin::save_model::<Credential, _>(&user, credential.deactivate(&state.db)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Adds a secret under a credential
pub async fn create_secret(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(credential_id): Path<Uuid>,
    Json(req): Json<CreateSecretRequest>,
) -> ApiResult<(StatusCode, Json<CredentialSecret>)> {
    req.validate()?;

    // The parent credential must exist and be addressable.
    Credential::find_by_id(&state.db, credential_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Credential not found".to_string()))?;

    let secret = admin::save_model::<CredentialSecret, _>(
        &user,
        CredentialSecret::create(
            &state.db,
            CreateCredentialSecret {
                credential_id,
                key: req.key,
                value: req.value,
            },
        ),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(secret)))
}

/// Lists a credential's active secrets
pub async fn list_secrets(
    State(state): State<AppState>,
    Path(credential_id): Path<Uuid>,
) -> ApiResult<Json<Vec<CredentialSecret>>> {
    let secrets = CredentialSecret::list_for_credential(&state.db, credential_id).await?;
    Ok(Json(secrets))
}

/// Rotates a secret value
pub async fn update_secret(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSecretRequest>,
) -> ApiResult<Json<CredentialSecret>> {
    req.validate()?;

    let mut secret = CredentialSecret::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Secret not found".to_string()))?;

    admin::save_model::<CredentialSecret, _>(
        &user,
        secret.update(
            &state.db,
            UpdateCredentialSecret {
                value: Some(req.value),
            },
        ),
    )
    .await?;

    Ok(Json(secret))
}

/// Deactivates (soft-deletes) a secret
pub async fn delete_secret(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut secret = CredentialSecret::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Secret not found".to_string()))?;

    admin::save_model::<CredentialSecret, _>(&user, secret.deactivate(&state.db)).await?;

    Ok(StatusCode::NO_CONTENT)
}
