/// Tests for the admin save path
///
/// Every mutating handler saves through `admin::save_model`, which scopes
/// the requesting user's username around the save. These tests verify that
/// for each entity, a save performed on behalf of user "mock1" stamps both
/// audit columns with "mock1" — and that a save outside the admin path
/// fails.
///
/// The stamping happens on the in-memory record before any SQL runs, so no
/// database is needed here.

use cadre_api::admin;
use cadre_core::audit::username_on_model;
use cadre_core::auth::middleware::CurrentUser;
use cadre_core::models::application::{Application, CreateApplication};
use cadre_core::models::credential::{CreateCredential, Credential};
use cadre_core::models::credential_secret::{CreateCredentialSecret, CredentialSecret};
use cadre_core::models::project::{CreateProject, Project};
use cadre_core::models::scm_repository::{CreateScmRepository, ScmRepository};
use cadre_core::models::scm_service::{CreateScmService, ScmService};
use cadre_core::models::team::{CreateTeam, Team, UpdateTeam};
use uuid::Uuid;

fn mock_user() -> CurrentUser {
    CurrentUser {
        id: Uuid::new_v4(),
        username: "mock1".to_string(),
    }
}

#[tokio::test]
async fn test_team_save_stores_username() {
    let user = mock_user();

    let team = admin::save_model::<Team, _>(&user, async {
        Team::new(CreateTeam {
            name: "team".to_string(),
            slug: "TEAM".to_string(),
            group_name: "group1".to_string(),
        })
    })
    .await
    .unwrap();

    assert_eq!(team.created_username, "mock1");
    assert_eq!(team.modified_username, "mock1");
}

#[tokio::test]
async fn test_project_save_stores_username() {
    let user = mock_user();

    let project = admin::save_model::<Project, _>(&user, async {
        Project::new(CreateProject {
            team_id: Uuid::new_v4(),
            name: "Project D".to_string(),
            slug: "PRJD".to_string(),
        })
    })
    .await
    .unwrap();

    assert_eq!(project.created_username, "mock1");
    assert_eq!(project.modified_username, "mock1");
}

#[tokio::test]
async fn test_application_save_stores_username() {
    let user = mock_user();

    let application = admin::save_model::<Application, _>(&user, async {
        Application::new(CreateApplication {
            project_id: Uuid::new_v4(),
            scm_repository_id: Uuid::new_v4(),
            name: "Application D".to_string(),
            slug: "APPD".to_string(),
        })
    })
    .await
    .unwrap();

    assert_eq!(application.created_username, "mock1");
    assert_eq!(application.modified_username, "mock1");
}

#[tokio::test]
async fn test_credential_save_stores_username() {
    let user = mock_user();

    let credential = admin::save_model::<Credential, _>(&user, async {
        Credential::new(CreateCredential {
            team_id: Uuid::new_v4(),
            name: "Credential D".to_string(),
            slug: "CRED".to_string(),
        })
    })
    .await
    .unwrap();

    assert_eq!(credential.created_username, "mock1");
    assert_eq!(credential.modified_username, "mock1");
}

#[tokio::test]
async fn test_credential_secret_save_stores_username() {
    let user = mock_user();

    let secret = admin::save_model::<CredentialSecret, _>(&user, async {
        CredentialSecret::new(CreateCredentialSecret {
            credential_id: Uuid::new_v4(),
            key: "access_key".to_string(),
            value: "supersecret".to_string(),
        })
    })
    .await
    .unwrap();

    assert_eq!(secret.created_username, "mock1");
    assert_eq!(secret.modified_username, "mock1");
}

#[tokio::test]
async fn test_scm_service_save_stores_username() {
    let user = mock_user();

    let service = admin::save_model::<ScmService, _>(&user, async {
        ScmService::new(CreateScmService {
            scm_service_type: "git".to_string(),
            server_url: "www.example.com".to_string(),
        })
    })
    .await
    .unwrap();

    assert_eq!(service.created_username, "mock1");
    assert_eq!(service.modified_username, "mock1");
}

#[tokio::test]
async fn test_scm_repository_save_stores_username() {
    let user = mock_user();

    let repository = admin::save_model::<ScmRepository, _>(&user, async {
        ScmRepository::new(CreateScmRepository {
            scm_service_id: Uuid::new_v4(),
            credential_id: Uuid::new_v4(),
            organisation: "acme".to_string(),
            repository_name: "sample".to_string(),
        })
    })
    .await
    .unwrap();

    assert_eq!(repository.created_username, "mock1");
    assert_eq!(repository.modified_username, "mock1");
}

#[tokio::test]
async fn test_save_outside_admin_path_fails() {
    let err = Team::new(CreateTeam {
        name: "team".to_string(),
        slug: "TEAM".to_string(),
        group_name: "group1".to_string(),
    })
    .unwrap_err();

    assert!(err.to_string().contains("username_on_model(Team, username)"));
}

#[tokio::test]
async fn test_later_save_by_other_user_keeps_creator() {
    let creator = mock_user();

    let mut team = admin::save_model::<Team, _>(&creator, async {
        Team::new(CreateTeam {
            name: "team".to_string(),
            slug: "TEAM".to_string(),
            group_name: "group1".to_string(),
        })
    })
    .await
    .unwrap();

    let editor = CurrentUser {
        id: Uuid::new_v4(),
        username: "mock2".to_string(),
    };

    admin::save_model::<Team, _>(&editor, async {
        team.apply(UpdateTeam {
            name: Some("renamed".to_string()),
            ..Default::default()
        })
    })
    .await
    .unwrap();

    assert_eq!(team.created_username, "mock1");
    assert_eq!(team.modified_username, "mock2");
}

#[tokio::test]
async fn test_admin_scope_does_not_leak_across_entities() {
    let user = mock_user();

    // A Team scope does not authorize a Project save.
    let err = admin::save_model::<Team, _>(&user, async {
        Project::new(CreateProject {
            team_id: Uuid::new_v4(),
            name: "Project D".to_string(),
            slug: "PRJD".to_string(),
        })
    })
    .await
    .unwrap_err();

    assert!(err
        .to_string()
        .contains("username_on_model(Project, username)"));

    // Nested scopes work: establish both, save both.
    let (team, project) = username_on_model::<Team, _>("mock1", async {
        username_on_model::<Project, _>("mock1", async {
            let team = Team::new(CreateTeam {
                name: "team".to_string(),
                slug: "TEAM".to_string(),
                group_name: "group1".to_string(),
            })
            .unwrap();
            let project = Project::new(CreateProject {
                team_id: team.id,
                name: "Project D".to_string(),
                slug: "PRJD".to_string(),
            })
            .unwrap();
            (team, project)
        })
        .await
    })
    .await;

    assert_eq!(team.created_username, "mock1");
    assert_eq!(project.created_username, "mock1");
}
