// Services module for the PhishGuard engine
// Business logic layer: classification, page fetching, analysis orchestration

pub mod analysis;
pub mod classifier;
pub mod fetcher;

// Re-export commonly used services
pub use analysis::{Analysis, AnalysisError, AnalysisService};
pub use classifier::{Classifier, ClassifierError, Prediction};
pub use fetcher::{FetchedPage, PageFetcher};
