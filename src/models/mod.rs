pub mod analysis;

// Re-export common types
pub use analysis::{AnalyzeRequest, AnalyzeResponse, Verdict};
