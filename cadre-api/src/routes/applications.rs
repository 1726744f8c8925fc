/// Application management endpoints
///
/// # Endpoints
///
/// - `POST /v1/applications` - Create application
/// - `GET /v1/applications?project=<uuid>` - List a project's active applications
/// - `GET /v1/applications/:id` - Get application
/// - `PUT /v1/applications/:id` - Update application
/// - `DELETE /v1/applications/:id` - Deactivate application

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
use cadre_core::models::application::{Application, CreateApplication, UpdateApplication};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create application request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateApplicationRequest {
    /// Owning project
    pub project_id: Uuid,

    /// Source repository
    pub scm_repository_id: Uuid,

    /// Application name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Short identifier
    #[validate(length(min = 1, max = 32, message = "Slug must be 1-32 characters"))]
    pub slug: String,
}

/// Update application request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateApplicationRequest {
    /// New application name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New slug
    #[validate(length(min = 1, max = 32, message = "Slug must be 1-32 characters"))]
    pub slug: Option<String>,

    /// Point the application at another repository
    pub scm_repository_id: Option<Uuid>,
}

/// Query parameters for listing applications
#[derive(Debug, Deserialize)]
pub struct ListApplicationsQuery {
    /// Project to list applications for
    pub project: Uuid,
}

/// Builds the application routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/applications",
            post(create_application).get(list_applications),
        )
        .route(
            "/applications/:id",
            get(get_application)
                .put(update_application)
                .delete(delete_application),
        )
}

/// Creates an application
pub async fn create_application(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateApplicationRequest>,
) -> ApiResult<(StatusCode, Json<Application>)> {
    req.validate()?;

    let application = admin::save_model::<Application, _>(
        &user,
        Application::create(
            &state.db,
            CreateApplication {
                project_id: req.project_id,
                scm_repository_id: req.scm_repository_id,
                name: req.name,
                slug: req.slug,
            },
        ),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(application)))
}

/// Lists a project's active applications
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ListApplicationsQuery>,
) -> ApiResult<Json<Vec<Application>>> {
    let applications = Application::list_for_project(&state.db, query.project).await?;
    Ok(Json(applications))
}

/// Gets an application by ID
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Application>> {
    let application = Application::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    Ok(Json(application))
}

/// Updates an application
pub async fn update_application(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateApplicationRequest>,
) -> ApiResult<Json<Application>> {
    req.validate()?;

    let mut application = Application::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    admin::save_model::<Application, _>(
        &user,
        application.update(
            &state.db,
            UpdateApplication {
                name: req.name,
                slug: req.slug,
                scm_repository_id: req.scm_repository_id,
            },
        ),
    )
    .await?;

    Ok(Json(application))
}

/// Deactivates (soft-deletes) an application
pub async fn delete_application(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut application = Application::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    admin::save_model::<Application, _>(&user, application.deactivate(&state.db)).await?;

    Ok(StatusCode::NO_CONTENT)
}
