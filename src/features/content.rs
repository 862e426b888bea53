// Content feature checks
// Both checks need the fetched page. No page (timeout, network failure,
// unparseable body) scores as maximally suspicious rather than neutral:
// a target that cannot be inspected does not get the benefit of the doubt.

use crate::features::Signal;
use crate::services::fetcher::FetchedPage;
use crate::utils::url_normalizer::NormalizedUrl;

// Ratio bands, in percent. Fixed by the trained model's feature definition.
const IMAGE_SAFE_BELOW: f64 = 22.0;
const IMAGE_NEUTRAL_BELOW: f64 = 61.0;
const ANCHOR_SAFE_BELOW: f64 = 31.0;
const ANCHOR_NEUTRAL_BELOW: f64 = 67.0;

fn ratio_signal(count: usize, total: usize, safe_below: f64, neutral_below: f64) -> Signal {
    let percentage = count as f64 / total as f64 * 100.0;
    if percentage < safe_below {
        Signal::Safe
    } else if percentage < neutral_below {
        Signal::Neutral
    } else {
        Signal::Suspicious
    }
}

/// Share of `<img src>` values anchored to the page itself: containing the
/// full page URL, or shaped like a bare relative path (exactly one `.`).
pub fn image_source_locality(page: Option<&FetchedPage>, url: &NormalizedUrl) -> Signal {
    let Some(page) = page else {
        return Signal::Suspicious;
    };
    let sources = page.image_sources();
    if sources.is_empty() {
        return Signal::Suspicious;
    }
    let local = sources
        .iter()
        .filter(|src| src.contains(url.full()) || src.matches('.').count() == 1)
        .count();
    ratio_signal(local, sources.len(), IMAGE_SAFE_BELOW, IMAGE_NEUTRAL_BELOW)
}

/// Share of `<a href>` values that leave the page unsafely: fragment-only
/// targets, `javascript`/`mailto` targets, or hrefs pointing at neither the
/// page URL nor its host.
pub fn anchor_href_locality(page: Option<&FetchedPage>, url: &NormalizedUrl) -> Signal {
    let Some(page) = page else {
        return Signal::Suspicious;
    };
    let targets = page.anchor_targets();
    if targets.is_empty() {
        return Signal::Suspicious;
    }
    let unsafe_count = targets
        .iter()
        .filter(|href| {
            let lowered = href.to_lowercase();
            href.contains('#')
                || lowered.contains("javascript")
                || lowered.contains("mailto")
                || !(href.contains(url.full()) || href.contains(url.host()))
        })
        .count();
    ratio_signal(
        unsafe_count,
        targets.len(),
        ANCHOR_SAFE_BELOW,
        ANCHOR_NEUTRAL_BELOW,
    )
}

/// Both content signals for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentFeatures {
    pub image_source_locality: Signal,
    pub anchor_href_locality: Signal,
}

impl ContentFeatures {
    pub fn evaluate(page: Option<&FetchedPage>, url: &NormalizedUrl) -> Self {
        Self {
            image_source_locality: image_source_locality(page, url),
            anchor_href_locality: anchor_href_locality(page, url),
        }
    }
}
