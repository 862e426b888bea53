// Request/response types for the analysis API

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Longest raw URL the API accepts.
pub const MAX_URL_LENGTH: usize = 8192;

/// Inbound analysis request.
///
/// The `url` field defaults to empty when missing so absent input follows the
/// same invalid-input path as an empty string instead of failing body
/// deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[serde(default)]
    #[validate(length(max = 8192, message = "URL too long"))]
    pub url: String,
}

/// Final binary classification surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Phishing,
    Legitimate,
}

impl Verdict {
    /// Map the classifier's raw prediction: `-1` is phishing, anything else
    /// is legitimate.
    pub fn from_raw(raw: i8) -> Self {
        if raw == -1 {
            Verdict::Phishing
        } else {
            Verdict::Legitimate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Phishing => "PHISHING",
            Verdict::Legitimate => "LEGITIMATE",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful analysis response body.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub status: Verdict,
    pub confidence: f64,
    pub reasons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_prediction_mapping() {
        assert_eq!(Verdict::from_raw(-1), Verdict::Phishing);
        assert_eq!(Verdict::from_raw(1), Verdict::Legitimate);
        // Anything that is not -1 is legitimate, including unexpected values.
        assert_eq!(Verdict::from_raw(0), Verdict::Legitimate);
        assert_eq!(Verdict::from_raw(2), Verdict::Legitimate);
    }

    #[test]
    fn verdict_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&Verdict::Phishing).unwrap(),
            "\"PHISHING\""
        );
        assert_eq!(
            serde_json::to_string(&Verdict::Legitimate).unwrap(),
            "\"LEGITIMATE\""
        );
    }

    #[test]
    fn missing_url_deserializes_to_empty() {
        let request: AnalyzeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.url, "");
    }
}
