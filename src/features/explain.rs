// Verdict explanation
// Renders the high-signal lexical checks as fixed-text reasons. Only checks
// strong enough to stand alone are narrated; the weaker signals feed the
// classifier without generating copy.

use crate::features::lexical::LexicalFeatures;
use crate::features::Signal;
use crate::models::analysis::Verdict;

pub const REASON_IP_ADDRESS: &str = "IP Address used instead of Domain Name";
pub const REASON_LONG_URL: &str = "URL is abnormally long";
pub const REASON_SHORTENER: &str = "URL Shortening service detected";
pub const REASON_AT_SYMBOL: &str = "URL contains '@' symbol";
pub const REASON_DOUBLE_SLASH: &str = "URL contains double slash redirection";
pub const REASON_HYPHEN: &str = "Domain uses hyphen (-) to mimic legitimate brands";

/// Used when the verdict is phishing but none of the narrated checks failed
/// (the signal came from content features or a non-obvious combination).
pub const REASON_FALLBACK: &str = "Suspicious content structure and heuristic patterns detected";

/// One reason per failing high-signal check, in fixed order. A phishing
/// verdict always yields at least one reason.
///
/// Reads the lexical evaluations already computed for scoring, so the
/// explanation can never disagree with the vector that produced the verdict.
pub fn reasons_for(lexical: &LexicalFeatures, verdict: Verdict) -> Vec<String> {
    let checks = [
        (lexical.ip_literal_host, REASON_IP_ADDRESS),
        (lexical.url_length, REASON_LONG_URL),
        (lexical.shortener, REASON_SHORTENER),
        (lexical.at_symbol, REASON_AT_SYMBOL),
        (lexical.double_slash_redirect, REASON_DOUBLE_SLASH),
        (lexical.hyphenated_host, REASON_HYPHEN),
    ];

    let mut reasons: Vec<String> = checks
        .iter()
        .filter(|(signal, _)| signal.is_suspicious())
        .map(|(_, text)| text.to_string())
        .collect();

    if reasons.is_empty() && verdict == Verdict::Phishing {
        reasons.push(REASON_FALLBACK.to_string());
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean() -> LexicalFeatures {
        LexicalFeatures {
            ip_literal_host: Signal::Safe,
            url_length: Signal::Safe,
            shortener: Signal::Safe,
            at_symbol: Signal::Safe,
            double_slash_redirect: Signal::Safe,
            hyphenated_host: Signal::Safe,
            subdomain_depth: Signal::Safe,
            https_scheme: Signal::Safe,
        }
    }

    #[test]
    fn failing_checks_render_in_fixed_order() {
        let mut lexical = clean();
        lexical.hyphenated_host = Signal::Suspicious;
        lexical.ip_literal_host = Signal::Suspicious;

        let reasons = reasons_for(&lexical, Verdict::Phishing);
        assert_eq!(reasons, vec![REASON_IP_ADDRESS, REASON_HYPHEN]);
    }

    #[test]
    fn neutral_signals_do_not_narrate() {
        let mut lexical = clean();
        lexical.url_length = Signal::Neutral;
        assert!(reasons_for(&lexical, Verdict::Legitimate).is_empty());
    }

    #[test]
    fn weak_signals_never_narrate() {
        // Subdomain depth and scheme feed the classifier but produce no copy.
        let mut lexical = clean();
        lexical.subdomain_depth = Signal::Suspicious;
        lexical.https_scheme = Signal::Suspicious;
        let reasons = reasons_for(&lexical, Verdict::Phishing);
        assert_eq!(reasons, vec![REASON_FALLBACK]);
    }

    #[test]
    fn phishing_verdict_always_explained() {
        let reasons = reasons_for(&clean(), Verdict::Phishing);
        assert_eq!(reasons, vec![REASON_FALLBACK]);
    }

    #[test]
    fn clean_legitimate_verdict_needs_no_reason() {
        assert!(reasons_for(&clean(), Verdict::Legitimate).is_empty());
    }
}
