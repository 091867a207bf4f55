//! Integration tests for the HTTP server
//!
//! These tests start the real router on a loopback socket, point it at
//! wiremock sites, and read the event stream back with reqwest.

use serde_json::Value;
use site_checker::config::{CacheScope, Config};
use site_checker::server::{router, AppState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with fast retries
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.resolver.concurrency = 4;
    config.resolver.max_attempts = 2;
    config.resolver.retry_backoff_ms = 10;
    config.resolver.request_timeout_secs = 5;
    config
}

/// Starts the server and returns its base URL
async fn spawn_server(config: Config) -> String {
    let state = AppState::new(&config).expect("Failed to build app state");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, router(state))
            .await
            .expect("Server failed");
    });

    format!("http://{}", addr)
}

/// A frame of the event stream
#[derive(Debug)]
struct Frame {
    event: Option<String>,
    data: String,
}

fn parse_frames(body: &str) -> Vec<Frame> {
    body.split("\n\n")
        .filter_map(|block| {
            let mut event = None;
            let mut data = None;
            for line in block.lines() {
                if let Some(value) = line.strip_prefix("event:") {
                    event = Some(value.trim().to_string());
                } else if let Some(value) = line.strip_prefix("data:") {
                    data = Some(value.trim().to_string());
                }
            }
            data.map(|data| Frame { event, data })
        })
        .collect()
}

fn results(frames: &[Frame]) -> Vec<Value> {
    frames
        .iter()
        .filter(|f| f.event.is_none())
        .map(|f| serde_json::from_str(&f.data).expect("Result frame is not JSON"))
        .collect()
}

async fn mount_page(site: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(site)
        .await;
}

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/gone", addr)
}

#[tokio::test]
async fn test_health() {
    let base = spawn_server(create_test_config()).await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_site_url_is_bad_request() {
    let base = spawn_server(create_test_config()).await;

    let response = reqwest::get(format!("{}/api/check-site-content?checkLinks=true", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Site URL is required");
}

#[tokio::test]
async fn test_invalid_site_url_is_bad_request() {
    let base = spawn_server(create_test_config()).await;

    let response = reqwest::get(format!("{}/api/check-site-content?siteUrl=nope", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid site URL");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_unreachable_page_is_server_error() {
    let base = spawn_server(create_test_config()).await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/check-site-content", base))
        .query(&[("siteUrl", closed_port_url().as_str()), ("checkLinks", "true")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "An error occurred");
    assert!(body["details"].as_str().unwrap().starts_with("Failed to fetch"));
}

#[tokio::test]
async fn test_page_error_status_is_server_error() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    let base = spawn_server(create_test_config()).await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/check-site-content", base))
        .query(&[("siteUrl", site.uri().as_str()), ("checkLinks", "true")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert!(body["details"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn test_streams_links_and_images_then_completes() {
    let site = MockServer::start().await;
    let page = format!(
        r#"<html><body>
            <header><a href="/home">Home</a><img src="/img/logo.png" alt="Logo"></header>
            <main>
                <a href="/moved" aria-label="Go" target="_blank"><button>Moved</button></a>
                <a href="/styled" class="btn">Styled</a>
                <a href="{gone}">Gone</a>
                <img src="hero.jpg">
            </main>
            <footer><a href="/missing">Missing</a></footer>
        </body></html>"#,
        gone = closed_port_url()
    );
    mount_page(&site, page).await;
    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("Location", format!("{}/home", site.uri()).as_str()),
        )
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    let base = spawn_server(create_test_config()).await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/check-site-content", base))
        .query(&[
            ("siteUrl", site.uri().as_str()),
            ("checkLinks", "true"),
            ("checkImages", "true"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/event-stream"));
    assert_eq!(response.headers()["cache-control"], "no-cache");

    let body = response.text().await.unwrap();
    let frames = parse_frames(&body);

    let last = frames.last().expect("No frames received");
    assert_eq!(last.event.as_deref(), Some("complete"));
    assert_eq!(last.data, r#"{"status":"complete"}"#);
    assert_eq!(
        frames
            .iter()
            .filter(|f| f.event.as_deref() == Some("complete"))
            .count(),
        1
    );

    let results = results(&frames);
    assert_eq!(results.len(), 5 + 2);

    // Images go out before any link is resolved
    assert_eq!(results[0]["type"], "image");
    assert_eq!(results[1]["type"], "image");

    let link = |suffix: &str| {
        results
            .iter()
            .find(|r| r["type"] == "link" && r["originalUrl"].as_str().unwrap().ends_with(suffix))
            .unwrap_or_else(|| panic!("No result for {}", suffix))
            .clone()
    };

    let home = link("/home");
    assert_eq!(home["location"], "header");
    assert_eq!(home["statusCode"], 200);
    assert_eq!(home["linkType"], "link");
    assert_eq!(home["target"], "_self");
    assert_eq!(home["ariaLabel"], "");

    let moved = link("/moved");
    assert_eq!(moved["linkType"], "button");
    assert_eq!(moved["linkText"], "Moved");
    assert_eq!(moved["ariaLabel"], "Go");
    assert_eq!(moved["target"], "_blank");
    assert_eq!(moved["location"], "body");
    assert_eq!(moved["finalUrl"], format!("{}/home", site.uri()));
    assert_eq!(moved["statusCode"], 200);

    // A button-like class alone does not make an anchor a button
    let styled = link("/styled");
    assert_eq!(styled["linkType"], "link");
    assert_eq!(styled["statusCode"], 404);

    let gone = link("/gone");
    assert_eq!(gone["finalUrl"], "Error");
    assert_eq!(gone["statusCode"], "N/A");

    let missing = link("/missing");
    assert_eq!(missing["location"], "footer");
    assert_eq!(missing["statusCode"], 404);

    let logo = results
        .iter()
        .find(|r| r["imgName"] == "logo.png")
        .expect("No logo image");
    assert_eq!(logo["alt"], "Logo");
    assert_eq!(logo["location"], "header");
}

#[tokio::test]
async fn test_exclude_header_footer() {
    let site = MockServer::start().await;
    mount_page(
        &site,
        r#"<html><body>
            <header><a href="/nav">Nav</a></header>
            <a href="/content">Content</a>
            <footer><a href="/legal">Legal</a></footer>
        </body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;

    let base = spawn_server(create_test_config()).await;

    let body = reqwest::Client::new()
        .get(format!("{}/api/check-site-content", base))
        .query(&[
            ("siteUrl", site.uri().as_str()),
            ("checkLinks", "true"),
            ("excludeHeaderFooter", "true"),
        ])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let results = results(&parse_frames(&body));
    assert_eq!(results.len(), 1);
    assert!(results[0]["originalUrl"].as_str().unwrap().ends_with("/content"));
    assert_eq!(results[0]["location"], "body");
}

#[tokio::test]
async fn test_nothing_requested_only_completes() {
    let site = MockServer::start().await;
    mount_page(&site, r#"<a href="/x">x</a><img src="y.png">"#.to_string()).await;

    let base = spawn_server(create_test_config()).await;

    let body = reqwest::Client::new()
        .get(format!("{}/api/check-site-content", base))
        .query(&[("siteUrl", site.uri().as_str())])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let frames = parse_frames(&body);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event.as_deref(), Some("complete"));
}

#[tokio::test]
async fn test_links_only_endpoint() {
    let site = MockServer::start().await;
    mount_page(
        &site,
        r#"<html><body>
            <header><a href="/nav">Nav</a></header>
            <img src="ignored.png">
        </body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/nav"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;

    let base = spawn_server(create_test_config()).await;

    let body = reqwest::Client::new()
        .get(format!("{}/check-site-urls-stream", base))
        .query(&[("siteUrl", site.uri().as_str())])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let frames = parse_frames(&body);
    let results = results(&frames);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["type"], "link");
    assert_eq!(results[0]["location"], "header");
    assert_eq!(frames.last().unwrap().event.as_deref(), Some("complete"));
}

#[tokio::test]
async fn test_shared_cache_spans_requests() {
    let site = MockServer::start().await;
    mount_page(&site, r#"<a href="/target">Target</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/target"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&site)
        .await;

    let mut config = create_test_config();
    config.cache.scope = CacheScope::Shared;
    let base = spawn_server(config).await;

    for _ in 0..2 {
        let body = reqwest::Client::new()
            .get(format!("{}/api/check-site-content", base))
            .query(&[("siteUrl", site.uri().as_str()), ("checkLinks", "true")])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        let results = results(&parse_frames(&body));
        assert_eq!(results[0]["statusCode"], 200);
    }
    // MockServer verifies `.expect(1)` on drop
}

#[tokio::test]
async fn test_cors_headers_present() {
    let base = spawn_server(create_test_config()).await;

    let response = reqwest::Client::new()
        .get(format!("{}/health", base))
        .header("Origin", "http://frontend.example")
        .send()
        .await
        .unwrap();

    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
