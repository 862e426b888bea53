// Time-boxed page fetch
// One GET per analysis, hard deadline enforced by the HTTP client itself so a
// stalled target can never hold a request open past the budget. Every failure
// mode collapses to "no document"; the pipeline continues without one.

use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

use crate::utils::url_normalizer::NormalizedUrl;

/// The parts of a fetched page the content features are allowed to see.
///
/// Attribute values are pulled out of the parsed tree immediately; the tree
/// itself never leaves this module, which keeps the scoring logic away from
/// the HTML parser and keeps the fetch future `Send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    image_sources: Vec<String>,
    anchor_targets: Vec<String>,
}

impl FetchedPage {
    /// Best-effort parse. Anything that is not HTML simply produces a page
    /// with no matching elements; markup errors never fail.
    pub fn from_html(body: &str) -> Self {
        let document = Html::parse_document(body);

        let mut image_sources = Vec::new();
        if let Ok(selector) = Selector::parse("img[src]") {
            for element in document.select(&selector) {
                if let Some(src) = element.value().attr("src") {
                    image_sources.push(src.to_string());
                }
            }
        }

        let mut anchor_targets = Vec::new();
        if let Ok(selector) = Selector::parse("a[href]") {
            for element in document.select(&selector) {
                if let Some(href) = element.value().attr("href") {
                    anchor_targets.push(href.to_string());
                }
            }
        }

        Self {
            image_sources,
            anchor_targets,
        }
    }

    /// `src` values of all `<img>` elements that carry one.
    pub fn image_sources(&self) -> &[String] {
        &self.image_sources
    }

    /// `href` values of all `<a>` elements that carry one.
    pub fn anchor_targets(&self) -> &[String] {
        &self.anchor_targets
    }
}

/// Shared HTTP client for page fetches.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Build the client once; `timeout` is the whole-request deadline,
    /// including the body read.
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Fire-once fetch. No retries, default redirect policy, and no error
    /// surface: timeouts, refused connections and body failures all come
    /// back as `None`.
    pub async fn fetch(&self, url: &NormalizedUrl) -> Option<FetchedPage> {
        let response = match self.client.get(url.full()).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Fetch failed for {}: {}", url.full(), e);
                return None;
            },
        };

        // The status code is deliberately not checked: an error page is
        // still content worth scoring.
        match response.text().await {
            Ok(body) => Some(FetchedPage::from_html(&body)),
            Err(e) => {
                debug!("Failed to read body from {}: {}", url.full(), e);
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_img_and_anchor_attributes() {
        let page = FetchedPage::from_html(
            r#"<html><body>
                <img src="/logo.png"><img data-src="lazy.png"><img src="https://cdn.example.net/x.png">
                <a href="/about">About</a><a name="anchor-without-href">x</a>
            </body></html>"#,
        );
        assert_eq!(
            page.image_sources(),
            ["/logo.png", "https://cdn.example.net/x.png"]
        );
        assert_eq!(page.anchor_targets(), ["/about"]);
    }

    #[test]
    fn non_html_body_yields_empty_page() {
        let page = FetchedPage::from_html("%PDF-1.4 not actually markup");
        assert!(page.image_sources().is_empty());
        assert!(page.anchor_targets().is_empty());
    }

    #[test]
    fn malformed_markup_is_parsed_best_effort() {
        let page = FetchedPage::from_html(r#"<a href="/one"><img src="a.png"<a href="/two">"#);
        assert!(!page.anchor_targets().is_empty());
    }
}
