//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full mirror cycle end-to-end against a temporary output directory.

use site_mirror::{ConfigError, CrawlConfig, MirrorError, Scraper};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given seed and output directory
fn create_test_config(seed: &str, output_dir: &Path) -> CrawlConfig {
    let mut config = CrawlConfig::new(seed);
    config.max_depth = 2;
    config.workers = 4;
    config.timeout = Duration::from_secs(5);
    config.user_agent = "TestBot/1.0".to_string();
    config.output_dir = Some(output_dir.to_path_buf());
    config
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn run(scraper: &Scraper) -> site_mirror::CrawlReport {
    tokio::time::timeout(Duration::from_secs(30), scraper.run(CancellationToken::new()))
        .await
        .expect("crawl should terminate")
        .expect("crawl should start")
}

#[tokio::test]
async fn test_full_mirror_single_site() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    mount_html(
        &mock_server,
        "/",
        r#"<!DOCTYPE html>
<html><head>
<title>Home</title>
<link rel="stylesheet" href="/style.css">
</head><body>
<a href="/about">About</a>
<a href="https://other.example.org/elsewhere">Elsewhere</a>
<img src="img/logo.png" alt="logo">
</body></html>"#,
    )
    .await;

    mount_html(
        &mock_server,
        "/about",
        r#"<html><body><a href="/">Home</a><p>About us</p></body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/style.css"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("body { background: url(/img/bg.png); }", "text/css"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89u8, b'P', b'N', b'G'], "image/png"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", base_url), out.path());
    let scraper = Scraper::new(config).unwrap();
    let report = run(&scraper).await;

    assert!(!report.cancelled);
    assert_eq!(report.stats.pages_saved, 2);
    assert_eq!(report.stats.resources_saved, 2);
    assert_eq!(report.stats.failed, 0);

    let index = std::fs::read_to_string(out.path().join("index.html")).unwrap();
    let about_path = out.path().join("about.html");
    let style_path = out.path().join("style.css");
    let logo_path = out.path().join("img").join("logo.png");

    assert!(about_path.exists());
    assert!(style_path.exists());
    assert_eq!(std::fs::read(&logo_path).unwrap(), vec![0x89u8, b'P', b'N', b'G']);

    // Same-host references point into the mirror, cross-host ones stay remote
    assert!(index.contains(&format!("href=\"{}\"", about_path.display())));
    assert!(index.contains(&format!("href=\"{}\"", style_path.display())));
    assert!(index.contains(&format!("src=\"{}\"", logo_path.display())));
    assert!(index.contains("href=\"https://other.example.org/elsewhere\""));
    assert!(index.starts_with("<!DOCTYPE html>"));

    // Stylesheets are stored as served
    let css = std::fs::read_to_string(&style_path).unwrap();
    assert_eq!(css, "body { background: url(/img/bg.png); }");
}

#[tokio::test]
async fn test_robots_disallowed_path_never_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private\n").await;

    mount_html(
        &mock_server,
        "/",
        r#"<html><body>
        <a href="/public">Public</a>
        <a href="/private/secret">Secret</a>
        </body></html>"#,
    )
    .await;
    mount_html(&mock_server, "/public", "<html><body>ok</body></html>").await;

    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("secret", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", base_url), out.path());
    let scraper = Scraper::new(config).unwrap();
    let report = run(&scraper).await;

    assert_eq!(report.stats.blocked_by_robots, 1);
    assert_eq!(report.stats.pages_saved, 2);
    assert!(out.path().join("public.html").exists());
    assert!(!out.path().join("private").exists());
}

#[tokio::test]
async fn test_robots_group_matched_by_product_token() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_robots(
        &mock_server,
        "User-agent: TestBot\nDisallow: /\n\nUser-agent: *\nAllow: /\n",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", base_url), out.path());
    let scraper = Scraper::new(config).unwrap();
    let report = run(&scraper).await;

    assert_eq!(report.stats.blocked_by_robots, 1);
    assert_eq!(report.visited, 0);
}

#[tokio::test]
async fn test_ignore_robots() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/", "<html><body>home</body></html>").await;

    let mut config = create_test_config(&format!("{}/", base_url), out.path());
    config.ignore_robots = true;
    let scraper = Scraper::new(config).unwrap();
    let report = run(&scraper).await;

    assert_eq!(report.stats.pages_saved, 1);
    assert!(out.path().join("index.html").exists());
}

#[tokio::test]
async fn test_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/",
        r#"<html><body><a href="/level1">Next</a></body></html>"#,
    )
    .await;
    mount_html(
        &mock_server,
        "/level1",
        r#"<html><body><a href="/level2">Next</a></body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&format!("{}/", base_url), out.path());
    config.max_depth = 1;
    config.ignore_robots = true;
    let scraper = Scraper::new(config).unwrap();
    let report = run(&scraper).await;

    assert_eq!(report.stats.pages_saved, 2);
    assert_eq!(report.stats.depth_exceeded, 1);
    assert_eq!(report.visited, 2);
}

#[tokio::test]
async fn test_failures_do_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/",
        r#"<html><head>
        <script src="/broken.js"></script>
        <script src="/app.js"></script>
        </head><body><a href="/gone">Gone</a></body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/broken.js"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app.js"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("console.log(1);", "application/javascript"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&format!("{}/", base_url), out.path());
    config.ignore_robots = true;
    let scraper = Scraper::new(config).unwrap();
    let report = run(&scraper).await;

    assert_eq!(report.stats.failed, 2);
    assert_eq!(report.stats.files_saved(), 2);
    assert!(out.path().join("app.js").exists());
    assert!(!out.path().join("broken.js").exists());
}

#[tokio::test]
async fn test_sends_configured_user_agent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "MirrorBot/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&format!("{}/", base_url), out.path());
    config.user_agent = "MirrorBot/2.0".to_string();
    config.ignore_robots = true;
    let scraper = Scraper::new(config).unwrap();
    let report = run(&scraper).await;

    assert_eq!(report.stats.pages_saved, 1);
}

#[tokio::test]
async fn test_unwritable_output_dir_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    // A regular file where a directory is needed
    let blocker = out.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", base_url), &blocker.join("mirror"));
    let scraper = Scraper::new(config).unwrap();
    let result = scraper.run(CancellationToken::new()).await;

    assert!(matches!(
        result,
        Err(MirrorError::Config(ConfigError::OutputDir { .. }))
    ));
}
