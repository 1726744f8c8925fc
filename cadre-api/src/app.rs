/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use cadre_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, routes};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use cadre_core::auth::middleware::{authenticate, AuthError};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token validation
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /v1/                             # API v1 (JWT required)
///     ├── /teams                       # POST, GET (+ /:id GET/PUT/DELETE)
///     ├── /projects                    # POST, GET?team= (+ /:id GET/PUT/DELETE)
///     ├── /applications                # POST, GET?project= (+ /:id GET/PUT/DELETE)
///     ├── /credentials                 # POST, GET?team= (+ /:id GET/PUT/DELETE)
///     ├── /credentials/:id/secrets     # POST, GET
///     ├── /secrets/:id                 # PUT, DELETE
///     ├── /scm-services                # POST, GET (+ /:id GET/PUT/DELETE)
///     └── /scm-repositories            # POST, GET?service= (+ /:id GET/PUT/DELETE)
/// ```
///
/// Every mutating route saves through the admin scope, so the requesting
/// user's username lands in the audit columns.
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // CRUD routes (require JWT authentication)
    let v1_routes = Router::new()
        .merge(routes::teams::router())
        .merge(routes::projects::router())
        .merge(routes::applications::router())
        .merge(routes::credentials::router())
        .merge(routes::scm::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware wrapper
///
/// Bridges the shared `authenticate` middleware to this server's state.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    authenticate(state.jwt_secret(), req, next).await
}
