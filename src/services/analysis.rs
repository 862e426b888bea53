// URL analysis engine
// One request, one evaluation: normalize, score lexically, fetch under the
// deadline, score content, classify, explain. The explanation reads the same
// feature evaluations as the score, so the two can never disagree.

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::features::{ContentFeatures, FeatureVector, LexicalFeatures};
use crate::models::analysis::Verdict;
use crate::services::classifier::Classifier;
use crate::services::fetcher::PageFetcher;
use crate::utils::url_normalizer::{normalize, NormalizeError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidInput(String),
}

impl From<NormalizeError> for AnalysisError {
    fn from(e: NormalizeError) -> Self {
        AnalysisError::InvalidInput(e.to_string())
    }
}

/// Outcome of one URL evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub verdict: Verdict,
    pub confidence: f64,
    pub reasons: Vec<String>,
}

/// Stateless per-request evaluator over the shared classifier and fetch
/// client. Nothing here survives a request: no caches, no retries, no
/// cross-request ordering.
pub struct AnalysisService {
    classifier: Arc<Classifier>,
    fetcher: PageFetcher,
}

impl AnalysisService {
    pub fn new(classifier: Arc<Classifier>, fetcher: PageFetcher) -> Self {
        Self {
            classifier,
            fetcher,
        }
    }

    /// Evaluate one raw URL to a verdict, confidence and reasons.
    ///
    /// Input validation happens before anything else; nothing touches the
    /// network for empty input. A failed or slow fetch degrades the content
    /// features instead of failing the request.
    pub async fn analyze(&self, raw_url: &str) -> Result<Analysis, AnalysisError> {
        let scan_id = Uuid::new_v4();
        let started = Instant::now();

        let url = normalize(raw_url)?;

        let lexical = LexicalFeatures::evaluate(&url);
        let page = self.fetcher.fetch(&url).await;
        let content = ContentFeatures::evaluate(page.as_ref(), &url);

        let vector = FeatureVector::assemble(&lexical, &content);
        let prediction = self.classifier.classify(&vector);
        let reasons = crate::features::reasons_for(&lexical, prediction.verdict);

        info!(
            "Scan {} classified {} as {} ({}% confidence, document={}) in {}ms",
            scan_id,
            url.full(),
            prediction.verdict,
            prediction.confidence,
            page.is_some(),
            started.elapsed().as_millis()
        );

        Ok(Analysis {
            verdict: prediction.verdict,
            confidence: prediction.confidence,
            reasons,
        })
    }
}
