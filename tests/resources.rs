//
//  sourcecraft-cli
//  tests/resources.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Resource callers: paths, bodies and envelopes.

mod common;

use mockito::Matcher;
use serde_json::json;
use sourcecraft_cli::api::resources::{
    CreateIssue, CreateMilestone, CreatePullRequest, CreateRepoRequest, CubePath,
    ForkRepoRequest, Priority, RepoRole, RunWorkflow, SubjectRole, UpdateIssue,
    UpdatePullRequest, Visibility,
};
use sourcecraft_cli::api::ApiError;

use common::client_for;

const JSON: &str = "application/json";

#[tokio::test]
async fn test_list_repositories_unwraps_envelope() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/orgs/acme/repos")
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(
            json!({
                "repositories": [
                    {"slug": "app", "name": "App", "clone_url": {"ssh": "git@ssh.sourcecraft.dev:acme/app.git"}},
                    {"slug": "lib", "visibility": "private"}
                ],
                "next_page_token": "abc"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let page = client.list_repositories("acme").await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.len(), 2);
    assert!(page.has_next());
    assert_eq!(page.items[0].slug.as_deref(), Some("app"));
    assert_eq!(page.items[1].visibility.as_deref(), Some("private"));
}

#[tokio::test]
async fn test_empty_page_token_means_last_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/acme/app/issues")
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"issues":[],"next_page_token":""}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let page = client.list_issues("acme", "app").await.unwrap();

    assert!(page.is_empty());
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_create_repository_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/orgs/acme/repos")
        .match_body(Matcher::Json(json!({
            "name": "My App",
            "slug": "my-app",
            "visibility": "internal"
        })))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"slug":"my-app","name":"My App"}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let request = CreateRepoRequest {
        name: "My App".to_string(),
        slug: "my-app".to_string(),
        description: None,
        visibility: Some(Visibility::Internal),
    };
    let repo = client.create_repository("acme", &request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(repo.slug.as_deref(), Some("my-app"));
}

#[tokio::test]
async fn test_get_repository_not_found_is_friendly() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/acme/ghost")
        .with_status(404)
        .with_header("content-type", JSON)
        .with_body(r#"{"message":"not found","request_id":"r-1"}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let err = client.get_repository("acme", "ghost").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.request_id(), Some("r-1"));
    assert_eq!(
        err.to_string(),
        "repository 'acme/ghost' not found or you don't have permission"
    );
}

#[tokio::test]
async fn test_get_repository_includes_parent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/team/app")
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"slug":"app","parent":{"slug":"app","owner":{"slug":"acme"}}}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let repo = client.get_repository("team", "app").await.unwrap();

    let parent = repo.parent.unwrap();
    assert_eq!(parent.owner.unwrap().slug.as_deref(), Some("acme"));
}

#[tokio::test]
async fn test_fork_repository_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/repos/acme/app/fork")
        .match_body(Matcher::Json(json!({
            "org_slug": "team",
            "slug": "app-copy",
            "default_branch_only": true
        })))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"slug":"app-copy","owner":{"slug":"team"}}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let request = ForkRepoRequest {
        org_slug: "team".to_string(),
        slug: Some("app-copy".to_string()),
        default_branch_only: true,
    };
    let fork = client
        .fork_repository("acme", "app", &request)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(fork.full_name().as_deref(), Some("team/app-copy"));
}

#[tokio::test]
async fn test_pull_request_lifecycle_paths() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/repos/acme/app/pulls")
        .match_body(Matcher::Json(json!({
            "title": "Add retries",
            "source_branch": "feature",
            "target_branch": "main",
            "publish": false
        })))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"slug":"12","status":"draft"}"#)
        .create_async()
        .await;
    let update = server
        .mock("PATCH", "/repos/acme/app/pulls/12")
        .match_body(Matcher::Json(json!({"title": "Add retry policy"})))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"slug":"12","title":"Add retry policy"}"#)
        .create_async()
        .await;
    let merge = server
        .mock("POST", "/repos/acme/app/pulls/12/decision")
        .match_body(Matcher::Json(json!({"review_decision": "approve"})))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"created_decision":"approve","pull_request_id":"pr-12"}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());

    let request = CreatePullRequest {
        title: "Add retries".to_string(),
        source_branch: "feature".to_string(),
        target_branch: "main".to_string(),
        description: None,
        reviewer_ids: Vec::new(),
        publish: false,
    };
    let pr = client
        .create_pull_request("acme", "app", &request)
        .await
        .unwrap();
    assert_eq!(pr.status.as_deref(), Some("draft"));

    let edit = UpdatePullRequest {
        title: Some("Add retry policy".to_string()),
        ..Default::default()
    };
    let pr = client
        .update_pull_request("acme", "app", "12", &edit)
        .await
        .unwrap();
    assert_eq!(pr.title.as_deref(), Some("Add retry policy"));

    let decision = client.merge_pull_request("acme", "app", "12").await.unwrap();
    assert_eq!(decision.created_decision.as_deref(), Some("approve"));

    create.assert_async().await;
    update.assert_async().await;
    merge.assert_async().await;
}

#[tokio::test]
async fn test_issue_create_and_close() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/repos/acme/app/issues")
        .match_body(Matcher::Json(json!({
            "title": "Crash on start",
            "priority": "blocker",
            "assignee_id": "u-7"
        })))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"slug":"5","title":"Crash on start"}"#)
        .create_async()
        .await;
    let close = server
        .mock("PATCH", "/repos/acme/app/issues/5")
        .match_body(Matcher::Json(json!({"status_slug": "closed"})))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"slug":"5","status":{"slug":"closed"}}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());

    let request = CreateIssue {
        title: "Crash on start".to_string(),
        priority: Some(Priority::Blocker),
        assignee_id: Some("u-7".to_string()),
        ..Default::default()
    };
    let issue = client.create_issue("acme", "app", &request).await.unwrap();
    assert_eq!(issue.slug.as_deref(), Some("5"));

    let closed = client
        .update_issue("acme", "app", "5", &UpdateIssue::close())
        .await
        .unwrap();
    assert_eq!(closed.status.unwrap().label(), "closed");

    create.assert_async().await;
    close.assert_async().await;
}

#[tokio::test]
async fn test_milestones_use_items_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/acme/app/milestones")
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"items":[{"slug":"v1","name":"Release 1.0"}]}"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/repos/acme/app/milestones")
        .match_body(Matcher::Json(json!({
            "name": "Release 2.0",
            "deadline": "2025-12-31T00:00:00Z"
        })))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"slug":"v2","name":"Release 2.0"}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());

    let page = client.list_milestones("acme", "app").await.unwrap();
    assert_eq!(page.items[0].name.as_deref(), Some("Release 1.0"));

    let request = CreateMilestone {
        name: "Release 2.0".to_string(),
        deadline: Some("2025-12-31T00:00:00Z".to_string()),
        ..Default::default()
    };
    let milestone = client
        .create_milestone("acme", "app", &request)
        .await
        .unwrap();
    assert_eq!(milestone.slug.as_deref(), Some("v2"));
    create.assert_async().await;
}

#[tokio::test]
async fn test_role_add_and_remove_paths() {
    let body = json!({
        "subject_roles": [{"role": "maintainer", "subject": {"type": "user", "id": "u-1"}}]
    });

    let mut server = mockito::Server::new_async().await;
    let add = server
        .mock("POST", "/repos/acme/app/roles")
        .match_body(Matcher::Json(body.clone()))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body("{}")
        .create_async()
        .await;
    let remove = server
        .mock("POST", "/repos/acme/app/roles/remove")
        .match_body(Matcher::Json(body))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body("{}")
        .create_async()
        .await;
    server
        .mock("GET", "/repos/acme/app/roles")
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(
            r#"{"subject_roles":[{"role":"admin","subject":{"type":"user","id":"u-9"}}]}"#,
        )
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());

    client
        .add_repo_role(
            "acme",
            "app",
            vec![SubjectRole::user("u-1", RepoRole::Maintainer)],
        )
        .await
        .unwrap();
    client
        .remove_repo_role(
            "acme",
            "app",
            vec![SubjectRole::user("u-1", RepoRole::Maintainer)],
        )
        .await
        .unwrap();
    let roles = client.list_repo_roles("acme", "app").await.unwrap();

    add.assert_async().await;
    remove.assert_async().await;
    assert_eq!(roles.items[0].known_role(), Some(RepoRole::Admin));
    assert_eq!(roles.items[0].subject.id, "u-9");
}

#[tokio::test]
async fn test_role_list_tolerates_other_subjects_and_roles() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/acme/app/roles")
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(
            json!({
                "subject_roles": [
                    {"role": "admin", "subject": {"type": "user", "id": "u-9"}},
                    {"role": "developer", "subject": {"type": "group", "id": "g-1"}},
                    {"role": "auditor", "subject": {"type": "service_account", "id": "sa-2"}}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let roles = client.list_repo_roles("acme", "app").await.unwrap();

    assert_eq!(roles.len(), 3);
    assert_eq!(roles.items[1].subject.kind, "group");
    assert_eq!(roles.items[1].known_role(), Some(RepoRole::Developer));
    assert_eq!(roles.items[2].role, "auditor");
    assert_eq!(roles.items[2].known_role(), None);
}

#[tokio::test]
async fn test_cicd_paths() {
    let mut server = mockito::Server::new_async().await;
    let run = server
        .mock("POST", "/acme/app/cicd/runs")
        .match_body(Matcher::Json(json!({"workflow_slug": "build", "revision": "main"})))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"flux_id":"f-1","trigger_status":"created"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/acme/app/cicd/runs")
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"runs":[{"slug":"42","status":"running"}]}"#)
        .create_async()
        .await;
    let logs = server
        .mock("GET", "/acme/app/cicd/logs/42/build/compile/linux")
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(r#"{"logs":"step 1\nstep 2"}"#)
        .create_async()
        .await;
    let artifact = server
        .mock("GET", "/acme/app/cicd/artifacts/42/build/compile/linux")
        .with_status(200)
        .with_header("content-type", "application/zip")
        .with_body(b"PK\x03\x04".to_vec())
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let cube = CubePath::new("42", "build", "compile", "linux");

    let request = RunWorkflow {
        workflow_slug: "build".to_string(),
        revision: Some("main".to_string()),
        workflow_revision: None,
    };
    let triggered = client.run_workflow("acme", "app", &request).await.unwrap();
    assert_eq!(triggered.trigger_status.as_deref(), Some("created"));

    let runs = client.list_runs("acme", "app").await.unwrap();
    assert_eq!(runs.items[0].slug.as_deref(), Some("42"));

    assert_eq!(
        client.get_logs("acme", "app", &cube).await.unwrap(),
        "step 1\nstep 2"
    );
    assert_eq!(
        client.get_artifact("acme", "app", &cube).await.unwrap(),
        b"PK\x03\x04".to_vec()
    );

    run.assert_async().await;
    logs.assert_async().await;
    artifact.assert_async().await;
}

#[tokio::test]
async fn test_get_run_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/acme/app/cicd/runs/999")
        .with_status(404)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let err = client.get_run("acme", "app", "999").await.unwrap_err();

    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(
        err.to_string(),
        "run '999' in 'acme/app' not found or you don't have permission"
    );
}
