// Content fetcher behavior tests
// A raw TCP stub stands in for the target site so the deadline and failure
// paths run against real sockets without leaving loopback.

use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use phishguard_core::{normalize, PageFetcher};

const USER_AGENT: &str = "PhishGuard-Bot/1.0 (test)";

/// Serve one HTTP response on an ephemeral port, optionally stalling first.
/// Returns the URL to fetch.
async fn serve_once(body: &'static str, stall: Option<Duration>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut request = [0u8; 2048];
            let _ = stream.read(&mut request).await;
            if let Some(delay) = stall {
                tokio::time::sleep(delay).await;
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{}/", address)
}

#[tokio::test]
async fn fetch_parses_images_and_anchors() {
    let page_url = serve_once(
        r##"<html><body>
            <img src="logo.png"><img src="https://cdn.example.net/banner.jpg">
            <a href="#top">Top</a><a href="/about">About</a>
        </body></html>"##,
        None,
    )
    .await;

    let fetcher = PageFetcher::new(Duration::from_secs(2), USER_AGENT);
    let url = normalize(&page_url).unwrap();
    let page = fetcher.fetch(&url).await.expect("stub server page");

    assert_eq!(
        page.image_sources(),
        ["logo.png", "https://cdn.example.net/banner.jpg"]
    );
    assert_eq!(page.anchor_targets(), ["#top", "/about"]);
}

#[tokio::test]
async fn refused_connection_yields_no_document() {
    // Bind and immediately drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = PageFetcher::new(Duration::from_secs(2), USER_AGENT);
    let url = normalize(&format!("http://{}/", address)).unwrap();

    let started = Instant::now();
    assert!(fetcher.fetch(&url).await.is_none());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn stalled_target_is_abandoned_at_the_deadline() {
    let page_url = serve_once("<html></html>", Some(Duration::from_secs(10))).await;

    let fetcher = PageFetcher::new(Duration::from_secs(1), USER_AGENT);
    let url = normalize(&page_url).unwrap();

    let started = Instant::now();
    assert!(fetcher.fetch(&url).await.is_none());

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(900), "gave up too early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(3), "deadline not enforced: {:?}", elapsed);
}

#[tokio::test]
async fn non_html_body_still_counts_as_a_document() {
    let page_url = serve_once("{\"not\": \"html\"}", None).await;

    let fetcher = PageFetcher::new(Duration::from_secs(2), USER_AGENT);
    let url = normalize(&page_url).unwrap();
    let page = fetcher.fetch(&url).await.expect("body should parse best-effort");

    assert!(page.image_sources().is_empty());
    assert!(page.anchor_targets().is_empty());
}
