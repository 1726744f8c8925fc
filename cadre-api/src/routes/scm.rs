/// SCM service and repository endpoints
///
/// # Endpoints
///
/// - `POST /v1/scm-services` - Create SCM service
/// - `GET /v1/scm-services` - List active SCM services
/// - `GET /v1/scm-services/:id` - Get SCM service
/// - `PUT /v1/scm-services/:id` - Update SCM service
/// - `DELETE /v1/scm-services/:id` - Deactivate SCM service
/// - `POST /v1/scm-repositories` - Create SCM repository
/// - `GET /v1/scm-repositories?service=<uuid>` - List a service's repositories
/// - `GET /v1/scm-repositories/:id` - Get SCM repository
/// - `PUT /v1/scm-repositories/:id` - Update SCM repository
/// - `DELETE /v1/scm-repositories/:id` - Deactivate SCM repository

use crate::{
    admin,
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use cadre_core::auth::middleware::CurrentUser;
use cadre_core::models::scm_repository::{
    CreateScmRepository, ScmRepository, UpdateScmRepository,
};
use cadre_core::models::scm_service::{CreateScmService, ScmService, UpdateScmService};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create SCM service request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateScmServiceRequest {
    /// Service kind (e.g., "bitbucket", "github", "gitlab")
    #[validate(length(min = 1, max = 64, message = "Type must be 1-64 characters"))]
    pub scm_service_type: String,

    /// Base URL of the server
    #[validate(length(min = 1, max = 512, message = "Server URL must be 1-512 characters"))]
    pub server_url: String,
}

/// Update SCM service request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateScmServiceRequest {
    /// New service kind
    #[validate(length(min = 1, max = 64, message = "Type must be 1-64 characters"))]
    pub scm_service_type: Option<String>,

    /// New base URL
    #[validate(length(min = 1, max = 512, message = "Server URL must be 1-512 characters"))]
    pub server_url: Option<String>,
}

/// Create SCM repository request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateScmRepositoryRequest {
    /// Service the repository lives on
    pub scm_service_id: Uuid,

    /// Credential used to access the repository
    pub credential_id: Uuid,

    /// Organisation / namespace
    #[validate(length(min = 1, max = 255, message = "Organisation must be 1-255 characters"))]
    pub organisation: String,

    /// Repository name
    #[validate(length(min = 1, max = 255, message = "Repository name must be 1-255 characters"))]
    pub repository_name: String,
}

/// Update SCM repository request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateScmRepositoryRequest {
    /// New organisation
    #[validate(length(min = 1, max = 255, message = "Organisation must be 1-255 characters"))]
    pub organisation: Option<String>,

    /// New repository name
    #[validate(length(min = 1, max = 255, message = "Repository name must be 1-255 characters"))]
    pub repository_name: Option<String>,

    /// Switch to another credential
    pub credential_id: Option<Uuid>,
}

/// Query parameters for listing repositories
#[derive(Debug, Deserialize)]
pub struct ListRepositoriesQuery {
    /// Service to list repositories for
    pub service: Uuid,
}

/// Builds the SCM routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scm-services", post(create_service).get(list_services))
        .route(
            "/scm-services/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
        .route(
            "/scm-repositories",
            post(create_repository).get(list_repositories),
        )
        .route(
            "/scm-repositories/:id",
            get(get_repository)
                .put(update_repository)
                .delete(delete_repository),
        )
}

/// Creates an SCM service
pub async fn create_service(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateScmServiceRequest>,
) -> ApiResult<(StatusCode, Json<ScmService>)> {
    req.validate()?;

    let service = admin::save_model::<ScmService, _>(
        &user,
        ScmService::create(
            &state.db,
            CreateScmService {
                scm_service_type: req.scm_service_type,
                server_url: req.server_url,
            },
        ),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(service)))
}

/// Lists all active SCM services
pub async fn list_services(State(state): State<AppState>) -> ApiResult<Json<Vec<ScmService>>> {
    let services = ScmService::list(&state.db).await?;
    Ok(Json(services))
}

/// Gets an SCM service by ID
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ScmService>> {
    let service = ScmService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("SCM service not found".to_string()))?;

    Ok(Json(service))
}

/// Updates an SCM service
pub async fn update_service(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateScmServiceRequest>,
) -> ApiResult<Json<ScmService>> {
    req.validate()?;

    let mut service = ScmService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("SCM service not found".to_string()))?;

    admin::save_model::<ScmService, _>(
        &user,
        service.update(
            &state.db,
            UpdateScmService {
                scm_service_type: req.scm_service_type,
                server_url: req.server_url,
            },
        ),
    )
    .await?;

    Ok(Json(service))
}

/// Deactivates (soft-deletes) an SCM service
pub async fn delete_service(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut service = ScmService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("SCM service not found".to_string()))?;

    admin::save_model::<ScmService, _>(&user, service.deactivate(&state.db)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Creates an SCM repository
pub async fn create_repository(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateScmRepositoryRequest>,
) -> ApiResult<(StatusCode, Json<ScmRepository>)> {
    req.validate()?;

    let repository = admin::save_model::<ScmRepository, _>(
        &user,
        ScmRepository::create(
            &state.db,
            CreateScmRepository {
                scm_service_id: req.scm_service_id,
                credential_id: req.credential_id,
                organisation: req.organisation,
                repository_name: req.repository_name,
            },
        ),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(repository)))
}

/// Lists a service's active repositories
pub async fn list_repositories(
    State(state): State<AppState>,
    Query(query): Query<ListRepositoriesQuery>,
) -> ApiResult<Json<Vec<ScmRepository>>> {
    let repositories = ScmRepository::list_for_service(&state.db, query.service).await?;
    Ok(Json(repositories))
}

/// Gets an SCM repository by ID
pub async fn get_repository(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ScmRepository>> {
    let repository = ScmRepository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("SCM repository not found".to_string()))?;

    Ok(Json(repository))
}

/// Updates an SCM repository
pub async fn update_repository(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateScmRepositoryRequest>,
) -> ApiResult<Json<ScmRepository>> {
    req.validate()?;

    let mut repository = ScmRepository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("SCM repository not found".to_string()))?;

    admin::save_model::<ScmRepository, _>(
        &user,
        repository.update(
            &state.db,
            UpdateScmRepository {
                organisation: req.organisation,
                repository_name: req.repository_name,
                credential_id: req.credential_id,
            },
        ),
    )
    .await?;

    Ok(Json(repository))
}

/// Deactivates (soft-deletes) an SCM repository
pub async fn delete_repository(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut repository = ScmRepository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("SCM repository not found".to_string()))?;

    admin::save_model::<ScmRepository, _>(&user, repository.deactivate(&state.db)).await?;

    Ok(StatusCode::NO_CONTENT)
}
