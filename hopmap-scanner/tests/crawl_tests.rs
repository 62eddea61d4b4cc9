// End-to-end crawl tests over a mock HTTP server

use hopmap_scanner::Crawler;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html")
        .set_body_string(format!("<html><body>{}</body></html>", body))
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

fn quick_crawler() -> Crawler<hopmap_scanner::HttpFetcher> {
    Crawler::over_http_with_timeout(5)
        .unwrap()
        .with_politeness_delay(Duration::ZERO)
}

/// Scenario: seed allowed (robots.txt answers 404), document links to /a,
/// /b and /a again. Level 0 is the seed alone; level 1 holds /a and /b once
/// each despite the duplicate href.
#[tokio::test]
async fn test_two_level_crawl_with_duplicate_links() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/a">A again</a>"#,
    )
    .await;
    mount_page(&server, "/a", "leaf").await;
    mount_page(&server, "/b", "leaf").await;

    let seed = format!("{}/", server.uri());
    let report = quick_crawler().run(&seed).await.unwrap();

    assert_eq!(report.levels[&0], vec![seed.clone()]);
    assert_eq!(
        report.levels[&1],
        vec![format!("{}a", seed), format!("{}b", seed)]
    );
    assert_eq!(report.total_pages(), 3);
    assert_eq!(report.max_level(), Some(1));
}

/// Scenario: the seed is disallowed by a served robots.txt. The report is
/// empty and the seed document itself is never requested.
#[tokio::test]
async fn test_disallowed_seed_is_never_fetched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .mount(&server)
        .await;

    // The seed page would happily serve links; expect(0) proves the gate
    // short-circuits before any document fetch.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/a">A</a>"#))
        .expect(0)
        .mount(&server)
        .await;

    let report = quick_crawler()
        .run(&format!("{}/", server.uri()))
        .await
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(report.total_pages(), 0);
}

/// Scenario: a page links back to the seed. The self-referential link is
/// already visited and must not reappear at a deeper level.
#[tokio::test]
async fn test_seed_self_link_is_dropped() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());
    mount_page(&server, "/", &format!(r#"<a href="{}">home</a>"#, seed)).await;

    let report = quick_crawler().run(&seed).await.unwrap();

    assert_eq!(report.levels[&0], vec![seed]);
    assert!(!report.levels.contains_key(&1));
}

/// Scenario: a level-1 URL answers 500. It keeps its level-1 slot (it was
/// recorded at discovery time) but contributes nothing at level 2.
#[tokio::test]
async fn test_server_error_is_a_soft_skip() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/ok">ok</a><a href="/boom">boom</a>"#).await;
    mount_page(&server, "/ok", r#"<a href="/ok-child">c</a>"#).await;
    mount_page(&server, "/ok-child", "leaf").await;

    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let report = quick_crawler().run(&seed).await.unwrap();

    assert!(report.levels[&1].contains(&format!("{}boom", seed)));
    assert_eq!(report.levels[&2], vec![format!("{}ok-child", seed)]);
}

/// An unreachable origin means the robots policy cannot be confirmed, so
/// nothing is crawled at all.
#[tokio::test]
async fn test_unreachable_site_fails_closed() {
    // Nothing listens on port 1.
    let report = quick_crawler().run("http://127.0.0.1:1/").await.unwrap();
    assert!(report.is_empty());
}

/// robots.txt is fetched once per origin even though every frontier entry
/// is re-checked against it.
#[tokio::test]
async fn test_robots_fetched_once_per_origin() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow:\n"))
        .expect(1)
        .mount(&server)
        .await;

    mount_page(&server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#).await;
    mount_page(&server, "/a", "leaf").await;
    mount_page(&server, "/b", "leaf").await;

    let report = quick_crawler()
        .run(&format!("{}/", server.uri()))
        .await
        .unwrap();
    assert_eq!(report.total_pages(), 3);
}

/// A page with no outbound links ends its branch; the crawl still visits
/// every sibling.
#[tokio::test]
async fn test_leaf_pages_terminate_naturally() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/a">a</a>"#).await;
    mount_page(&server, "/a", "<p>no links</p>").await;

    let seed = format!("{}/", server.uri());
    let report = quick_crawler().run(&seed).await.unwrap();

    assert_eq!(report.total_pages(), 2);
    assert_eq!(report.max_level(), Some(1));
}

/// Progress callback observes every processed frontier entry with its level.
#[tokio::test]
async fn test_progress_callback_sees_levels() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/a">a</a>"#).await;
    mount_page(&server, "/a", "leaf").await;

    let observed: Arc<Mutex<Vec<(usize, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let observed_clone = observed.clone();

    let crawler = quick_crawler().with_progress_callback(Arc::new(move |level, url| {
        observed_clone.lock().unwrap().push((level, url));
    }));

    let seed = format!("{}/", server.uri());
    crawler.run(&seed).await.unwrap();

    let observed = observed.lock().unwrap();
    assert_eq!(observed.len(), 2);
    assert_eq!(observed[0], (0, seed.clone()));
    assert_eq!(observed[1].0, 1);
}

/// Depth cap: links past the configured hop distance are never scheduled,
/// while everything within it still is.
#[tokio::test]
async fn test_depth_cap_limits_traversal() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/a">a</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/b">b</a>"#).await;
    mount_page(&server, "/b", r#"<a href="/c">c</a>"#).await;

    let seed = format!("{}/", server.uri());
    let report = quick_crawler()
        .with_max_depth(2)
        .run(&seed)
        .await
        .unwrap();

    assert_eq!(report.max_level(), Some(2));
    assert_eq!(report.total_pages(), 3);
}
