
use std::path::PathBuf;

use gh_export_secrets::ExportError;
use gh_export_secrets::config::{ExportConfig, SecretSelection};
use gh_export_secrets::services::{ExportSummary, export_to_file};
use gh_export_secrets::types::SecretCategory;
use mockito::{Server, ServerGuard};
use test_util::*;

fn config(
    server: &ServerGuard,
    repositories: &[&str],
    selections: &[SecretSelection],
    output_file: PathBuf,
) -> ExportConfig {
    install_crypto_provider();
    ExportConfig::new(
        "octo".to_string(),
        repositories.iter().map(|r| r.to_string()).collect(),
        selections,
        output_file,
        mock_host(server),
        "test-token".to_string(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_export_organization_actions_secrets() {
    let mut server = Server::new_async().await;
    let _page = mock_repository_page(
        &mut server,
        None,
        vec![
            repository_node(101, "infra", "PUBLIC"),
            repository_node(102, "web", "PRIVATE"),
            repository_node(103, "tools", "INTERNAL"),
        ],
        None,
    )
    .await;
    let _org = mock_get_json(
        &mut server,
        "/orgs/octo/actions/secrets",
        secrets_body(&[
            ("DEPLOY_KEY", Some("selected")),
            ("SHARED", Some("all")),
            ("INTERNAL_ONLY", Some("private")),
        ]),
    )
    .await;
    let _scoped = mock_get_json(
        &mut server,
        "/orgs/octo/actions/secrets/DEPLOY_KEY/repositories",
        scoped_body(&[(101, "infra")]),
    )
    .await;
    let _infra = mock_get_json(
        &mut server,
        "/repos/octo/infra/actions/secrets",
        secrets_body(&[]),
    )
    .await;
    let _web = mock_get_json(
        &mut server,
        "/repos/octo/web/actions/secrets",
        secrets_body(&[("NPM_TOKEN", None)]),
    )
    .await;
    let _tools = mock_get_json(
        &mut server,
        "/repos/octo/tools/actions/secrets",
        secrets_body(&[]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let config = config(
        &server,
        &[],
        &[SecretSelection::Only(SecretCategory::Actions)],
        path.clone(),
    );

    let summary = export_to_file(&config).await.unwrap();

    assert_eq!(
        summary,
        ExportSummary {
            repositories: 3,
            rows: 5
        }
    );
    let report = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        report.lines().collect::<Vec<_>>(),
        vec![
            "SecretLevel,SecretType,SecretName,SecretAccess,RepositoryName,RepositoryID",
            "Organization,Actions,DEPLOY_KEY,selected,infra,101",
            "Organization,Actions,SHARED,all,,",
            "Organization,Actions,INTERNAL_ONLY,private,web,102",
            "Organization,Actions,INTERNAL_ONLY,private,tools,103",
            "Repository,Actions,NPM_TOKEN,RepoOnly,web,102",
        ]
    );
}

#[tokio::test]
async fn test_export_named_repositories() {
    let mut server = Server::new_async().await;
    let _repo = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({ "data": { "repository": repository_node(102, "web", "PRIVATE") } })
                .to_string(),
        )
        .create_async()
        .await;
    let org = mock_listing(&mut server, "/orgs/octo/dependabot/secrets")
        .expect(0)
        .create_async()
        .await;
    let _web = mock_get_json(
        &mut server,
        "/repos/octo/web/dependabot/secrets",
        secrets_body(&[("REGISTRY", None)]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let config = config(
        &server,
        &["web"],
        &[SecretSelection::Only(SecretCategory::Dependabot)],
        path.clone(),
    );

    export_to_file(&config).await.unwrap();

    let report = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        report.lines().skip(1).collect::<Vec<_>>(),
        vec!["Repository,Dependabot,REGISTRY,RepoOnly,web,102"]
    );
    org.assert_async().await;
}

#[tokio::test]
async fn test_failed_export_leaves_no_report() {
    let mut server = Server::new_async().await;
    let _page = mock_repository_page(
        &mut server,
        None,
        vec![repository_node(101, "infra", "PUBLIC")],
        None,
    )
    .await;
    let failing = mock_listing(&mut server, "/orgs/octo/codespaces/secrets")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Server Error","documentation_url":null}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let config = config(
        &server,
        &[],
        &[SecretSelection::Only(SecretCategory::Codespaces)],
        path.clone(),
    );

    let result = export_to_file(&config).await;

    assert!(matches!(result, Err(ExportError::Transport { .. })));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    // Once the API recovers the same output file can be used again.
    failing.remove_async().await;
    let _org = mock_get_json(
        &mut server,
        "/orgs/octo/codespaces/secrets",
        secrets_body(&[("DEV_KEY", Some("all"))]),
    )
    .await;
    let _infra = mock_get_json(
        &mut server,
        "/repos/octo/infra/codespaces/secrets",
        secrets_body(&[]),
    )
    .await;

    let summary = export_to_file(&config).await.unwrap();

    assert_eq!(summary.rows, 1);
    let report = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        report.lines().skip(1).collect::<Vec<_>>(),
        vec!["Organization,Codespaces,DEV_KEY,all,,"]
    );
}
