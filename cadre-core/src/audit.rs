/// Audit trail support: scoped usernames for model saves
///
/// Every audited model carries `created_username` / `modified_username`
/// columns recording who touched the record. Rather than threading the
/// acting username through every call site, callers establish a scope
/// around the save and the model stamps itself from that scope:
///
/// - [`username_on_model`] registers a username for one model type for
///   the dynamic extent of a future.
/// - [`scoped_username`] reads the registration during a save.
/// - [`MissingUsername`] is returned when a save happens outside any
///   scope for the model's type.
///
/// The registry is task-local, not a process global: each request task
/// on a multi-threaded runtime sees only its own registrations, so
/// concurrent requests can never stamp each other's usernames.
///
/// # Example
///
/// ```
/// use cadre_core::audit::{username_on_model, scoped_username, AuditModel};
///
/// struct Team;
///
/// impl AuditModel for Team {
///     const NAME: &'static str = "Team";
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let username = username_on_model::<Team, _>("alice", async {
///     scoped_username::<Team>()
/// })
/// .await
/// .unwrap();
///
/// assert_eq!(username, "alice");
/// # }
/// ```

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;

tokio::task_local! {
    /// Per-task registry of model type -> acting username.
    ///
    /// The map itself is created by the outermost `username_on_model` on a
    /// task; nested scopes insert into the live map and restore the previous
    /// entry on exit.
    static SCOPED_USERNAMES: RefCell<HashMap<TypeId, String>>;
}

/// Marker trait for models with audit username columns
///
/// `NAME` must match the type's name; it appears in [`MissingUsername`]
/// messages so the caller knows which scope to establish.
pub trait AuditModel {
    /// Model name as used in error messages
    const NAME: &'static str;
}

/// Error returned when a save happens outside a username scope
///
/// The message names the model and the call the caller forgot to make.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no username registered for {model}; wrap the save in username_on_model({model}, username)")]
pub struct MissingUsername {
    /// Name of the model type that was saved without a scope
    pub model: &'static str,
}

/// Runs `fut` with `username` registered as the acting username for model `M`
///
/// The registration lasts exactly for the dynamic extent of `fut`. On exit
/// (normal or panicking) the previous state is restored: if an enclosing
/// scope had registered a username for the same model type, that outer
/// username becomes visible again; otherwise the entry is removed.
///
/// Scopes for different model types nest freely. The registry is keyed by
/// task, so scopes established on one task are invisible to every other
/// task.
///
/// # Example
///
/// ```
/// use cadre_core::audit::{username_on_model, scoped_username, AuditModel};
///
/// struct Project;
///
/// impl AuditModel for Project {
///     const NAME: &'static str = "Project";
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// username_on_model::<Project, _>("deploy-bot", async {
///     // any save of a Project in here stamps "deploy-bot"
///     assert_eq!(scoped_username::<Project>().unwrap(), "deploy-bot");
/// })
/// .await;
/// # }
/// ```
pub async fn username_on_model<M, F>(username: impl Into<String>, fut: F) -> F::Output
where
    M: AuditModel + 'static,
    F: Future,
{
    let key = TypeId::of::<M>();
    let username = username.into();

    if SCOPED_USERNAMES.try_with(|_| ()).is_ok() {
        // Already inside a scope on this task: register into the live map
        // and put the previous entry back once `fut` completes.
        let previous =
            SCOPED_USERNAMES.with(|registry| registry.borrow_mut().insert(key, username));
        let _restore = RestorePrevious { key, previous };
        fut.await
    } else {
        let mut registry = HashMap::new();
        registry.insert(key, username);
        SCOPED_USERNAMES.scope(RefCell::new(registry), fut).await
    }
}

/// Returns the username registered for model `M` on the current task
///
/// # Errors
///
/// Returns [`MissingUsername`] when no scope for `M` is active, which
/// includes being called outside any `username_on_model` at all.
pub fn scoped_username<M>() -> Result<String, MissingUsername>
where
    M: AuditModel + 'static,
{
    SCOPED_USERNAMES
        .try_with(|registry| registry.borrow().get(&TypeId::of::<M>()).cloned())
        .unwrap_or(None)
        .ok_or(MissingUsername { model: M::NAME })
}

/// Restores the registry entry that a nested scope shadowed.
struct RestorePrevious {
    key: TypeId,
    previous: Option<String>,
}

impl Drop for RestorePrevious {
    fn drop(&mut self) {
        let previous = self.previous.take();
        // try_with: during task teardown the registry may already be gone.
        let _ = SCOPED_USERNAMES.try_with(|registry| {
            let mut registry = registry.borrow_mut();
            match previous {
                Some(username) => registry.insert(self.key, username),
                None => registry.remove(&self.key),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Probe;

    impl AuditModel for Probe {
        const NAME: &'static str = "Probe";
    }

    struct Other;

    impl AuditModel for Other {
        const NAME: &'static str = "Other";
    }

    #[test]
    fn test_lookup_without_scope_fails() {
        let err = scoped_username::<Probe>().unwrap_err();
        assert_eq!(err.model, "Probe");
        assert!(err
            .to_string()
            .contains("username_on_model(Probe, username)"));
    }

    #[tokio::test]
    async fn test_scoped_lookup() {
        let username = username_on_model::<Probe, _>("test_user", async {
            scoped_username::<Probe>().unwrap()
        })
        .await;

        assert_eq!(username, "test_user");
    }

    #[tokio::test]
    async fn test_scope_cleared_on_exit() {
        username_on_model::<Probe, _>("test_user", async {}).await;

        assert!(scoped_username::<Probe>().is_err());
    }

    #[tokio::test]
    async fn test_scope_is_per_model_type() {
        username_on_model::<Probe, _>("probe_user", async {
            assert_eq!(scoped_username::<Probe>().unwrap(), "probe_user");

            // No scope for Other, even though Probe's is active.
            let err = scoped_username::<Other>().unwrap_err();
            assert_eq!(err.model, "Other");
        })
        .await;
    }

    #[tokio::test]
    async fn test_nested_scopes_for_different_models() {
        username_on_model::<Probe, _>("probe_user", async {
            username_on_model::<Other, _>("other_user", async {
                assert_eq!(scoped_username::<Probe>().unwrap(), "probe_user");
                assert_eq!(scoped_username::<Other>().unwrap(), "other_user");
            })
            .await;

            // Inner scope gone, outer untouched.
            assert_eq!(scoped_username::<Probe>().unwrap(), "probe_user");
            assert!(scoped_username::<Other>().is_err());
        })
        .await;
    }

    #[tokio::test]
    async fn test_nested_scope_same_model_restores_outer() {
        username_on_model::<Probe, _>("outer", async {
            username_on_model::<Probe, _>("inner", async {
                assert_eq!(scoped_username::<Probe>().unwrap(), "inner");
            })
            .await;

            assert_eq!(scoped_username::<Probe>().unwrap(), "outer");
        })
        .await;
    }

    #[tokio::test]
    async fn test_spawned_task_sees_no_scope() {
        username_on_model::<Probe, _>("test_user", async {
            // Scopes are task-local; a spawned task starts with none.
            let result = tokio::spawn(async { scoped_username::<Probe>() })
                .await
                .unwrap();

            assert!(result.is_err());
            assert_eq!(scoped_username::<Probe>().unwrap(), "test_user");
        })
        .await;

        assert!(scoped_username::<Probe>().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_tasks_are_isolated() {
        let first = tokio::spawn(username_on_model::<Probe, _>("first_user", async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            scoped_username::<Probe>().unwrap()
        }));

        let second = tokio::spawn(username_on_model::<Probe, _>("second_user", async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            scoped_username::<Probe>().unwrap()
        }));

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first.unwrap(), "first_user");
        assert_eq!(second.unwrap(), "second_user");
    }
}
