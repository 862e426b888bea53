// Utility modules for the PhishGuard engine

pub mod service_error;
pub mod url_normalizer;

pub use service_error::ServiceError;
pub use url_normalizer::{normalize, NormalizeError, NormalizedUrl};
