/// Project management endpoints
///
/// # Endpoints
///
/// - `POST /v1/projects` - Create project
/// - `GET /v1/projects?team=<uuid>` - List a team's active projects
/// - `GET /v1/projects/:id` - Get project
/// - `PUT /v1/projects/:id` - Update project
/// - `DELETE /v1/projects/:id` - Deactivate project

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
use cadre_core::models::project::{CreateProject, Project, UpdateProject};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Owning team
    pub team_id: Uuid,

    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Short identifier
    #[validate(length(min = 1, max = 32, message = "Slug must be 1-32 characters"))]
    pub slug: String,
}

/// Update project request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New slug
    #[validate(length(min = 1, max = 32, message = "Slug must be 1-32 characters"))]
    pub slug: Option<String>,

    /// Move the project to another team
    pub team_id: Option<Uuid>,
}

/// Query parameters for listing projects
#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    /// Team to list projects for
    pub team: Uuid,
}

/// Builds the project routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create_project).get(list_projects))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
}

/// Creates a project
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate()?;

    let project = admin::save_model::<Project, _>(
        &user,
        Project::create(
            &state.db,
            CreateProject {
                team_id: req.team_id,
                name: req.name,
                slug: req.slug,
            },
        ),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Lists a team's active projects
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list_for_team(&state.db, query.team).await?;
    Ok(Json(projects))
}

/// Gets a project by ID
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Updates a project
pub async fn update_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let mut project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    admin::save_model::<Project, _>(
        &user,
        project.update(
            &state.db,
            UpdateProject {
                name: req.name,
                slug: req.slug,
                team_id: req.team_id,
            },
        ),
    )
    .await?;

    Ok(Json(project))
}

/// Deactivates (soft-deletes) a project
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    admin::save_model::<Project, _>(&user, project.deactivate(&state.db)).await?;

    Ok(StatusCode::NO_CONTENT)
}
