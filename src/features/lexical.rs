// Lexical feature checks
// Pure functions of the normalized URL: no I/O, no side effects, and every
// check always resolves to a signal. These run before (and independently of)
// the content fetch.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::app_config;
use crate::features::Signal;
use crate::utils::url_normalizer::NormalizedUrl;

// Length bands for the URL-length check.
const URL_LENGTH_SAFE_BELOW: usize = 54;
const URL_LENGTH_NEUTRAL_MAX: usize = 75;

// A `//` in the path at an offset beyond where the scheme's own marker would
// sit. The threshold is part of the trained model's feature definition and
// must not be tightened.
const DOUBLE_SLASH_OFFSET: usize = 6;

/// Compiled-in shortener catalog, used when the JSON catalog file is missing
/// or unreadable.
const FALLBACK_SHORTENER_DOMAINS: &[&str] = &[
    "bit.ly",
    "goo.gl",
    "shorte.st",
    "go2l.ink",
    "x.co",
    "ow.ly",
    "t.co",
    "tinyurl",
    "tr.im",
    "is.gd",
    "cli.gs",
    "yfrog.com",
    "migre.me",
    "ff.im",
    "tiny.cc",
    "url4.eu",
    "twit.ac",
    "su.pr",
    "twurl.nl",
    "snipurl.com",
    "short.to",
    "BudURL.com",
    "ping.fm",
    "post.ly",
    "Just.as",
    "bkite.com",
    "snipr.com",
    "fic.kr",
    "loopt.us",
    "doiop.com",
    "short.ie",
    "kl.am",
    "wp.me",
    "rubyurl.com",
    "om.ly",
    "to.ly",
    "bit.do",
    "t.wb",
    "lnkd.in",
    "db.tt",
    "qr.ae",
    "adf.ly",
    "bitly.com",
    "cur.lv",
    "tinyurl.com",
    "ity.im",
    "q.gs",
    "po.st",
    "bc.vc",
    "twitthis.com",
    "u.to",
    "j.mp",
    "buzurl.com",
    "cutt.us",
    "u.bb",
    "yourls.org",
    "prettylinkpro.com",
    "scrnch.me",
    "filoops.info",
    "vzturl.com",
    "qr.net",
    "1url.com",
    "tweez.me",
    "v.gd",
    "link.zip.net",
];

/// Shortener catalog file structure (`data/url_shorteners.json`).
#[derive(Debug, Deserialize)]
struct ShortenerCatalog {
    #[allow(dead_code)]
    description: String,
    domains: Vec<String>,
}

lazy_static! {
    /// Alternation over the shortener catalog, matched against the full URL
    /// string. Compiled once at first use.
    static ref SHORTENER_PATTERN: Regex = build_shortener_pattern();
}

fn build_shortener_pattern() -> Regex {
    let domains = load_shortener_domains(&app_config::config().shortener_catalog_path);
    let alternation = domains
        .iter()
        .map(|domain| regex::escape(domain))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).expect("Invalid shortener catalog pattern")
}

fn load_shortener_domains(path: &str) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<ShortenerCatalog>(&content) {
            Ok(catalog) if !catalog.domains.is_empty() => {
                info!(
                    "Loaded {} shortener domains from {}",
                    catalog.domains.len(),
                    path
                );
                catalog.domains
            },
            Ok(_) => {
                warn!("Shortener catalog {} is empty, using fallback list", path);
                fallback_domains()
            },
            Err(e) => {
                warn!(
                    "Failed to parse shortener catalog {}: {}. Using fallback list.",
                    path, e
                );
                fallback_domains()
            },
        },
        Err(e) => {
            warn!(
                "Failed to read shortener catalog {}: {}. Using fallback list.",
                path, e
            );
            fallback_domains()
        },
    }
}

fn fallback_domains() -> Vec<String> {
    FALLBACK_SHORTENER_DOMAINS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// =============================================================================
// FEATURE CHECKS
// =============================================================================

/// A literal IP in place of a domain name.
pub fn ip_literal_host(url: &NormalizedUrl) -> Signal {
    if url.host_is_ip() {
        Signal::Suspicious
    } else {
        Signal::Safe
    }
}

/// Overall URL length. Long URLs hide the interesting part past the address
/// bar.
pub fn url_length(url: &NormalizedUrl) -> Signal {
    let length = url.full().chars().count();
    if length < URL_LENGTH_SAFE_BELOW {
        Signal::Safe
    } else if length <= URL_LENGTH_NEUTRAL_MAX {
        Signal::Neutral
    } else {
        Signal::Suspicious
    }
}

/// Known URL-shortening service anywhere in the URL.
pub fn shortener(url: &NormalizedUrl) -> Signal {
    if SHORTENER_PATTERN.is_match(url.full()) {
        Signal::Suspicious
    } else {
        Signal::Safe
    }
}

/// Literal `@`: browsers discard everything before it when resolving.
pub fn at_symbol(url: &NormalizedUrl) -> Signal {
    if url.full().contains('@') {
        Signal::Suspicious
    } else {
        Signal::Safe
    }
}

/// `//` in the path beyond where the scheme marker would sit, a common
/// open-redirect shape.
pub fn double_slash_redirect(url: &NormalizedUrl) -> Signal {
    match url.path().rfind("//") {
        Some(offset) if offset > DOUBLE_SLASH_OFFSET => Signal::Suspicious,
        _ => Signal::Safe,
    }
}

/// Hyphenated authority, typically mimicking a legitimate brand.
pub fn hyphenated_host(url: &NormalizedUrl) -> Signal {
    if url.authority().contains('-') {
        Signal::Suspicious
    } else {
        Signal::Safe
    }
}

/// Subdomain depth by host label count. An IP literal has no subdomain.
pub fn subdomain_depth(url: &NormalizedUrl) -> Signal {
    if url.host_is_ip() || url.host().is_empty() {
        return Signal::Safe;
    }
    let labels = url.host().trim_matches('.').split('.').count();
    if labels <= 2 {
        Signal::Safe
    } else if labels == 3 {
        Signal::Neutral
    } else {
        Signal::Suspicious
    }
}

/// Plain HTTP is a signal in itself.
pub fn https_scheme(url: &NormalizedUrl) -> Signal {
    if url.scheme() == "https" {
        Signal::Safe
    } else {
        Signal::Suspicious
    }
}

// =============================================================================
// EVALUATION
// =============================================================================

/// All eight lexical signals, evaluated once per request.
///
/// The scoring path and the explanation path both read from this struct, so
/// a verdict and its reasons always come from the same evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalFeatures {
    pub ip_literal_host: Signal,
    pub url_length: Signal,
    pub shortener: Signal,
    pub at_symbol: Signal,
    pub double_slash_redirect: Signal,
    pub hyphenated_host: Signal,
    pub subdomain_depth: Signal,
    pub https_scheme: Signal,
}

impl LexicalFeatures {
    pub fn evaluate(url: &NormalizedUrl) -> Self {
        Self {
            ip_literal_host: ip_literal_host(url),
            url_length: url_length(url),
            shortener: shortener(url),
            at_symbol: at_symbol(url),
            double_slash_redirect: double_slash_redirect(url),
            hyphenated_host: hyphenated_host(url),
            subdomain_depth: subdomain_depth(url),
            https_scheme: https_scheme(url),
        }
    }
}
