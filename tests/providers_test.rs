//! Tests for provider modules

use complyscan::error::ProviderError;
use complyscan::providers::github::GitHubProvider;
use complyscan::providers::local::LocalProvider;
use complyscan::providers::{fetch_with_fallback, ContentProvider, EntryKind, RepoRef};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Minimal HTTP/1.1 server answering contents API requests for `octo/repo`
async fn spawn_contents_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&buf);
                let target = request.split_whitespace().nth(1).unwrap_or("").to_string();

                let (status, extra, body) = route(&target);
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n{extra}\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

fn route(target: &str) -> (&'static str, &'static str, &'static str) {
    match target {
        "/repos/octo/repo/contents/requirements.txt?ref=master" => ("200 OK", "", "flask\n"),
        "/repos/octo/repo/contents" => (
            "200 OK",
            "Content-Type: application/json\r\n",
            r#"[{"name":"app.py","path":"app.py","type":"file"},
                {"name":"src","path":"src","type":"dir"},
                {"name":"vendored","path":"vendored","type":"submodule"}]"#,
        ),
        "/repos/octo/repo/contents/limited?ref=main" => (
            "403 Forbidden",
            "x-ratelimit-remaining: 0\r\nx-ratelimit-reset: 1700000000\r\n",
            "{}",
        ),
        "/repos/octo/repo/contents/boom?ref=main" => ("500 Internal Server Error", "", "{}"),
        _ => ("404 Not Found", "", "{}"),
    }
}

fn provider(api_url: &str) -> GitHubProvider {
    GitHubProvider::new(api_url, None, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_github_branch_fallback() {
    let api = spawn_contents_api().await;
    let github = provider(&api);
    let branches = vec!["main".to_string(), "master".to_string()];

    let content = fetch_with_fallback(&github, "octo", "repo", "requirements.txt", &branches)
        .await
        .unwrap();
    assert_eq!(content.as_deref(), Some("flask\n"));

    let missing = fetch_with_fallback(&github, "octo", "repo", "absent.py", &branches)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_github_listing_drops_submodules() {
    let api = spawn_contents_api().await;
    let entries = provider(&api)
        .list_directory("octo", "repo", "")
        .await
        .unwrap();

    let paths: Vec<(&str, EntryKind)> = entries.iter().map(|e| (e.path.as_str(), e.kind)).collect();
    assert_eq!(paths, vec![("app.py", EntryKind::File), ("src", EntryKind::Dir)]);
}

#[tokio::test]
async fn test_github_missing_directory_lists_empty() {
    let api = spawn_contents_api().await;
    let entries = provider(&api)
        .list_directory("octo", "repo", "nowhere")
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_github_errors_are_classified() {
    let api = spawn_contents_api().await;
    let github = provider(&api);

    let err = github
        .get_file_content("octo", "repo", "limited", "main")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited { reset: Some(1_700_000_000) }));

    let err = github
        .get_file_content("octo", "repo", "boom", "main")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Http { status: 500, .. }));
}

#[tokio::test]
async fn test_github_unreachable_host_is_network_error() {
    // Port 9 (discard) is not served locally
    let github = GitHubProvider::new("http://127.0.0.1:9", None, Duration::from_secs(2)).unwrap();
    let err = github
        .get_file_content("octo", "repo", "app.py", "main")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Network { .. }));
}

#[test]
fn test_repo_ref_forms() {
    for input in [
        "octocat/hello",
        "github.com/octocat/hello",
        "https://github.com/octocat/hello",
        "https://github.com/octocat/hello.git",
    ] {
        let repo = RepoRef::parse(input).unwrap();
        assert_eq!(repo.full_name(), "octocat/hello", "input: {input}");
    }
    assert!(RepoRef::parse("octocat").is_err());
    assert!(RepoRef::parse("").is_err());
}

#[tokio::test]
async fn test_local_provider_round_trip() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("pkg")).unwrap();
    fs::write(dir.path().join("pkg/mod.py"), "import os\n").unwrap();

    let local = LocalProvider::new(dir.path());
    let entries = local.list_directory("local", "repo", "").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Dir);

    let content = local
        .get_file_content("local", "repo", "pkg/mod.py", "main")
        .await
        .unwrap();
    assert_eq!(content.as_deref(), Some("import os\n"));

    let err = local
        .get_file_content("local", "repo", "../escape.py", "main")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidPath { .. }));
}
