/// Team management endpoints
///
/// # Endpoints
///
/// - `POST /v1/teams` - Create team
/// - `GET /v1/teams` - List active teams
/// - `GET /v1/teams/:id` - Get team
/// - `PUT /v1/teams/:id` - Update team
/// - `DELETE /v1/teams/:id` - Deactivate team
///
/// All saves go through the admin scope: the requesting user's username
/// is stamped into `created_username` / `modified_username`.

use crate::{
    admin,
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use cadre_core::auth::middleware::CurrentUser;
use cadre_core::models::team::{CreateTeam, Team, UpdateTeam};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Short unique identifier
    #[validate(length(min = 1, max = 32, message = "Slug must be 1-32 characters"))]
    pub slug: String,

    /// Auth group whose members manage the team
    #[validate(length(min = 1, max = 255, message = "Group name must be 1-255 characters"))]
    pub group_name: String,
}

/// Update team request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    /// New team name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New slug
    #[validate(length(min = 1, max = 32, message = "Slug must be 1-32 characters"))]
    pub slug: Option<String>,

    /// New auth group
    #[validate(length(min = 1, max = 255, message = "Group name must be 1-255 characters"))]
    pub group_name: Option<String>,
}

/// Builds the team routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/teams", post(create_team).get(list_teams))
        .route(
            "/teams/:id",
            get(get_team).put(update_team).delete(delete_team),
        )
}

/// Creates a team
pub async fn create_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    req.validate()?;

    let team = admin::save_model::<Team, _>(
        &user,
        Team::create(
            &state.db,
            CreateTeam {
                name: req.name,
                slug: req.slug,
                group_name: req.group_name,
            },
        ),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(team)))
}

/// Lists all active teams
pub async fn list_teams(State(state): State<AppState>) -> ApiResult<Json<Vec<Team>>> {
    let teams = Team::list(&state.db).await?;
    Ok(Json(teams))
}

/// Gets a team by ID
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Team>> {
    let team = Team::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    Ok(Json(team))
}

/// Updates a team
pub async fn update_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> ApiResult<Json<Team>> {
    req.validate()?;

    let mut team = Team::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    admin::save_model::<Team, _>(
        &user,
        team.update(
            &state.db,
            UpdateTeam {
                name: req.name,
                slug: req.slug,
                group_name: req.group_name,
            },
        ),
    )
    .await?;

    Ok(Json(team))
}

/// Deactivates (soft-deletes) a team
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut team = Team::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    admin::save_model::<Team, _>(&user, team.deactivate(&state.db)).await?;

    Ok(StatusCode::NO_CONTENT)
}
