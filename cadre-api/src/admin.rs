/// Admin save path: saving on behalf of the requesting user
///
/// Every mutating handler goes through [`save_model`], which wraps the
/// save in a `username_on_model` scope for the requesting user. The audit
/// columns then populate automatically; the API surface never accepts
/// `created_username` / `modified_username` as inputs.
///
/// One generic interceptor replaces a per-entity save hook: the entity is
/// picked by the type parameter, the user comes from the authentication
/// middleware.
///
/// # Example
///
/// ```no_run
/// use cadre_api::admin;
/// use cadre_core::auth::middleware::CurrentUser;
/// use cadre_core::models::team::{CreateTeam, Team};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user: CurrentUser) -> Result<(), Box<dyn std::error::Error>> {
/// let team = admin::save_model::<Team, _>(
///     &user,
///     Team::create(
///         &pool,
///         CreateTeam {
///             name: "Platform".to_string(),
///             slug: "PLTF".to_string(),
///             group_name: "platform-admins".to_string(),
///         },
///     ),
/// )
/// .await?;
///
/// assert_eq!(team.created_username, user.username);
/// # Ok(())
/// # }
/// ```

use std::future::Future;

use cadre_core::audit::{username_on_model, AuditModel};
use cadre_core::auth::middleware::CurrentUser;

/// Runs a save future under the requesting user's audit scope
///
/// `M` is the model being saved; `save` is any future that performs the
/// save (`Model::create`, `Model::update`, `Model::deactivate`, ...).
pub async fn save_model<M, F>(user: &CurrentUser, save: F) -> F::Output
where
    M: AuditModel + 'static,
    F: Future,
{
    tracing::debug!(model = M::NAME, username = %user.username, "Saving model for user");
    username_on_model::<M, _>(user.username.clone(), save).await
}
