use anyhow::Result;
use bintray_cleanup::adapters::PromptConfirmer;
use bintray_cleanup::domain::model::TIMESTAMP_FORMAT;
use bintray_cleanup::{
    CleanupEngine, CleanupOutcome, ExecuteOptions, HttpRepositoryClient, LocalStorage, Scope,
    Settings,
};
use chrono::{Duration, Utc};
use httpmock::prelude::*;
use httpmock::Mock;
use std::io::Cursor;
use tempfile::TempDir;

fn settings(server: &MockServer, cache_dir: &TempDir) -> Settings {
    let mut settings = Settings::new("alice", "secret");
    settings.api_base_url = server.url("/");
    settings.cache_dir = cache_dir.path().to_string_lossy().to_string();
    settings
}

fn no_input() -> PromptConfirmer<Cursor<Vec<u8>>, Vec<u8>> {
    PromptConfirmer::new(Cursor::new(Vec::new()), Vec::new())
}

fn answers(input: &str) -> PromptConfirmer<Cursor<Vec<u8>>, Vec<u8>> {
    PromptConfirmer::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn stamp(days_ago: i64) -> String {
    (Utc::now() - Duration::days(days_ago))
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Mocks the descriptor and detail endpoints of one package.
fn mock_package<'a>(server: &'a MockServer, package: &str, versions: &[(&str, i64)]) -> Vec<Mock<'a>> {
    let names: Vec<&str> = versions.iter().map(|(name, _)| *name).collect();
    let descriptor_path = format!("/packages/acme/maven/{}", package);
    let mut mocks = vec![server.mock(|when, then| {
        when.method(GET).path(descriptor_path.as_str());
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "name": package, "versions": names }));
    })];

    for (name, age) in versions {
        let detail_path = format!("/packages/acme/maven/{}/versions/{}", package, name);
        let body = serde_json::json!({
            "name": name,
            "owner": "acme",
            "repo": "maven",
            "package": package,
            "created": stamp(*age),
            "updated": stamp(*age),
            "vcs_tag": format!("v{}", name),
        });
        mocks.push(server.mock(|when, then| {
            when.method(GET)
                .path(detail_path.as_str())
                .header("Authorization", "Basic YWxpY2U6c2VjcmV0");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        }));
    }
    mocks
}

fn mock_delete<'a>(server: &'a MockServer, package: &str, name: &str) -> Mock<'a> {
    let path = format!("/packages/acme/maven/{}/versions/{}", package, name);
    server.mock(|when, then| {
        when.method(DELETE).path(path.as_str());
        then.status(200)
            .json_body(serde_json::json!({"message": "success"}));
    })
}

fn deleted_names(outcome: &CleanupOutcome) -> Vec<String> {
    outcome.deleted().iter().map(|v| v.name.clone()).collect()
}

#[tokio::test]
async fn test_deletes_only_versions_older_than_cutoff() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    mock_package(&server, "demo", &[("v1", 400), ("v2", 10)]);
    let delete_v1 = mock_delete(&server, "demo", "v1");
    let delete_v2 = mock_delete(&server, "demo", "v2");

    let settings = settings(&server, &temp_dir);
    let client = HttpRepositoryClient::new(&settings, LocalStorage::new(settings.cache_dir.clone()))?;
    let confirmer = no_input();
    let engine = CleanupEngine::new(&client, &confirmer);
    let options = ExecuteOptions {
        dryrun: false,
        limit: None,
        auto_confirm: true,
    };

    let outcome = engine
        .delete_old_versions(&Scope::package("acme", "maven", "demo"), 30, &options)
        .await?;

    assert_eq!(deleted_names(&outcome), vec!["v1"]);
    delete_v1.assert_hits(1);
    delete_v2.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_all_old_versions_keeps_the_newest() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    mock_package(&server, "demo", &[("v2", 200), ("v1", 400)]);
    let delete_v1 = mock_delete(&server, "demo", "v1");
    let delete_v2 = mock_delete(&server, "demo", "v2");

    let settings = settings(&server, &temp_dir);
    let client = HttpRepositoryClient::new(&settings, LocalStorage::new(settings.cache_dir.clone()))?;
    let confirmer = no_input();
    let engine = CleanupEngine::new(&client, &confirmer);
    let options = ExecuteOptions {
        dryrun: false,
        limit: None,
        auto_confirm: true,
    };

    let outcome = engine
        .delete_old_versions(&Scope::package("acme", "maven", "demo"), 30, &options)
        .await?;

    assert_eq!(deleted_names(&outcome), vec!["v1"]);
    delete_v1.assert_hits(1);
    delete_v2.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_dryrun_issues_no_delete_and_keeps_cache() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    let mocks = mock_package(&server, "demo", &[("v1", 400), ("v2", 300), ("v3", 1)]);
    let delete_v1 = mock_delete(&server, "demo", "v1");
    let delete_v2 = mock_delete(&server, "demo", "v2");

    let settings = settings(&server, &temp_dir);
    let client = HttpRepositoryClient::new(&settings, LocalStorage::new(settings.cache_dir.clone()))?;
    let confirmer = answers("y\ny\n");
    let engine = CleanupEngine::new(&client, &confirmer);

    let outcome = engine
        .delete_old_versions(
            &Scope::package("acme", "maven", "demo"),
            30,
            &ExecuteOptions::default(),
        )
        .await?;
    assert_eq!(deleted_names(&outcome), vec!["v1", "v2"]);
    delete_v1.assert_hits(0);
    delete_v2.assert_hits(0);

    // a second listing is served entirely from the cache
    engine
        .list_versions(&Scope::package("acme", "maven", "demo"))
        .await?;
    for mock in &mocks {
        mock.assert_hits(1);
    }
    Ok(())
}

#[tokio::test]
async fn test_declined_prompt_skips_one_version() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    mock_package(&server, "demo", &[("v1", 400), ("v2", 300), ("v3", 1)]);
    let delete_v1 = mock_delete(&server, "demo", "v1");
    let delete_v2 = mock_delete(&server, "demo", "v2");

    let settings = settings(&server, &temp_dir);
    let client = HttpRepositoryClient::new(&settings, LocalStorage::new(settings.cache_dir.clone()))?;
    let confirmer = answers("n\ny\n");
    let engine = CleanupEngine::new(&client, &confirmer);
    let options = ExecuteOptions {
        dryrun: false,
        ..ExecuteOptions::default()
    };

    let outcome = engine
        .delete_old_versions(&Scope::package("acme", "maven", "demo"), 30, &options)
        .await?;

    assert_eq!(deleted_names(&outcome), vec!["v2"]);
    delete_v1.assert_hits(0);
    delete_v2.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn test_repo_wide_limit_takes_first_package_first() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    server.mock(|when, then| {
        when.method(GET).path("/repos/acme/maven/packages");
        then.status(200)
            .json_body(serde_json::json!([{"name": "pkgA", "linked": false}, {"name": "pkgB", "linked": false}]));
    });
    mock_package(&server, "pkgA", &[("a1", 500), ("a2", 400), ("a3", 2)]);
    mock_package(&server, "pkgB", &[("b1", 300), ("b2", 2)]);
    let delete_a1 = mock_delete(&server, "pkgA", "a1");
    let delete_a2 = mock_delete(&server, "pkgA", "a2");
    let delete_b1 = mock_delete(&server, "pkgB", "b1");

    let settings = settings(&server, &temp_dir);
    let client = HttpRepositoryClient::new(&settings, LocalStorage::new(settings.cache_dir.clone()))?;
    let confirmer = no_input();
    let engine = CleanupEngine::new(&client, &confirmer);
    let options = ExecuteOptions {
        dryrun: false,
        limit: Some(1),
        auto_confirm: true,
    };

    let outcome = engine
        .delete_old_versions(&Scope::repo("acme", "maven"), 30, &options)
        .await?;

    assert_eq!(deleted_names(&outcome), vec!["a1"]);
    delete_a1.assert_hits(1);
    delete_a2.assert_hits(0);
    delete_b1.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_failed_delete_aborts_and_refreshes_listing() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    let mocks = mock_package(&server, "demo", &[("v1", 400), ("v2", 300), ("v3", 1)]);
    let delete_v1 = server.mock(|when, then| {
        when.method(DELETE).path("/packages/acme/maven/demo/versions/v1");
        then.status(500).body("internal error");
    });
    let delete_v2 = mock_delete(&server, "demo", "v2");

    let settings = settings(&server, &temp_dir);
    let client = HttpRepositoryClient::new(&settings, LocalStorage::new(settings.cache_dir.clone()))?;
    let confirmer = no_input();
    let engine = CleanupEngine::new(&client, &confirmer);
    let options = ExecuteOptions {
        dryrun: false,
        limit: None,
        auto_confirm: true,
    };

    let err = engine
        .delete_old_versions(&Scope::package("acme", "maven", "demo"), 30, &options)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("DELETE packages/acme/maven/demo/versions/v1"));
    delete_v1.assert_hits(1);
    delete_v2.assert_hits(0);

    // cache was cleared, so listing again goes back to the API
    engine
        .list_versions(&Scope::package("acme", "maven", "demo"))
        .await?;
    mocks[0].assert_hits(2);
    Ok(())
}

#[tokio::test]
async fn test_malformed_timestamp_aborts_listing() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    server.mock(|when, then| {
        when.method(GET).path("/packages/acme/maven/demo");
        then.status(200)
            .json_body(serde_json::json!({"versions": ["v1"]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/packages/acme/maven/demo/versions/v1");
        then.status(200).json_body(serde_json::json!({
            "name": "v1",
            "owner": "acme",
            "repo": "maven",
            "package": "demo",
            "created": "2019-05-22",
            "updated": "2019-05-22T12:34:56.123456+0000"
        }));
    });

    let settings = settings(&server, &temp_dir);
    let client = HttpRepositoryClient::new(&settings, LocalStorage::new(settings.cache_dir.clone()))?;
    let confirmer = no_input();
    let engine = CleanupEngine::new(&client, &confirmer);

    let err = engine
        .list_old_versions(&Scope::package("acme", "maven", "demo"), 30)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("GET packages/acme/maven/demo/versions/v1"));
    assert!(message.contains("created"));
    Ok(())
}
