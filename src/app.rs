// Application state and configuration
use std::sync::Arc;
use std::time::Duration;

use crate::{
    app_config::AppConfig,
    services::{AnalysisService, Classifier, PageFetcher},
};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub classifier: Arc<Classifier>,
    pub analysis: Arc<AnalysisService>,
}

impl AppState {
    /// Wire the engine together around an already-loaded classifier. The
    /// classifier is shared read-only; replacing the model means swapping
    /// the `Arc`, never mutating through it.
    pub fn new(config: Arc<AppConfig>, classifier: Arc<Classifier>) -> Self {
        let fetcher = PageFetcher::new(
            Duration::from_millis(config.fetch_timeout_ms),
            &config.fetch_user_agent,
        );
        let analysis = Arc::new(AnalysisService::new(classifier.clone(), fetcher));

        Self {
            config,
            classifier,
            analysis,
        }
    }
}
