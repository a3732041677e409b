use crate::billing::to_usd;
use serde::{Deserialize, Serialize};

/// Relative deviation beyond which a reported amount is flagged.
pub const DEVIATION_THRESHOLD: f64 = 0.05;

/// Deterministic classification of an actual billed amount against the
/// computed expectation. Amounts compare in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyVerdict {
    pub is_anomalous: bool,
    pub deviation_ratio: f64,
}

/// An external reviewer's take on the same numbers: its own boolean plus a
/// free-text rationale. Produced by the explanation collaborator, never by
/// this module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AnomalyReview {
    #[schemars(
        description = "Your verdict on whether the reported amount is a billing anomaly. You may disagree with the system's deterministic hint when the inputs justify it."
    )]
    pub is_anomaly: bool,

    #[schemars(description = "Short plain-language rationale for the verdict")]
    pub explanation: String,
}

/// Full anomaly assessment for one period. The deterministic `system_flag`
/// and the numeric anchor `expected_usd` are always present and testable
/// offline; an attached external review may disagree, and callers choose
/// which verdict to surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub expected_usd: f64,
    pub actual_usd: f64,
    pub deviation_ratio: f64,
    /// The crate's own classification.
    pub system_flag: bool,
    /// Verdict and rationale from the explanation collaborator, when one ran.
    pub review: Option<AnomalyReview>,
}

impl AnomalyReport {
    /// The externally-reported verdict: the reviewer's when present,
    /// otherwise the deterministic flag.
    pub fn verdict(&self) -> bool {
        self.review
            .as_ref()
            .map(|r| r.is_anomaly)
            .unwrap_or(self.system_flag)
    }
}

/// Compares an actual reported amount against the expected amount.
///
/// `actual` is normalized to USD with the same source-per-USD convention as
/// the billing calculator. Deviation is `|actual - expected| / expected` when
/// an amount was expected; when nothing was expected, any non-zero actual is
/// a full deviation of 1.0 and a zero actual deviates by 0.0.
pub fn classify_anomaly(
    expected_usd: f64,
    actual: f64,
    conversion_rate: Option<f64>,
) -> AnomalyVerdict {
    let actual_usd = to_usd(actual, conversion_rate);

    let deviation_ratio = if expected_usd > 0.0 {
        (actual_usd - expected_usd).abs() / expected_usd
    } else if (actual_usd - expected_usd).abs() > 0.0 {
        1.0
    } else {
        0.0
    };

    AnomalyVerdict {
        is_anomalous: deviation_ratio > DEVIATION_THRESHOLD,
        deviation_ratio,
    }
}

/// Builds a report from the deterministic classifier alone; the external
/// review slot starts empty and can be attached later.
pub fn assess(expected_usd: f64, actual: f64, conversion_rate: Option<f64>) -> AnomalyReport {
    let actual_usd = to_usd(actual, conversion_rate);
    let verdict = classify_anomaly(expected_usd, actual, conversion_rate);

    AnomalyReport {
        expected_usd,
        actual_usd,
        deviation_ratio: verdict.deviation_ratio,
        system_flag: verdict.is_anomalous,
        review: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_is_not_anomalous() {
        let verdict = classify_anomaly(108_571.43, 108_571.43, None);
        assert_eq!(verdict.deviation_ratio, 0.0);
        assert!(!verdict.is_anomalous);
    }

    #[test]
    fn test_ten_percent_over_is_flagged() {
        let expected = 100_000.0;
        let verdict = classify_anomaly(expected, expected * 1.10, None);
        assert!((verdict.deviation_ratio - 0.10).abs() < 1e-9);
        assert!(verdict.is_anomalous);
    }

    #[test]
    fn test_small_deviation_within_threshold() {
        let expected = 100_000.0;
        let verdict = classify_anomaly(expected, expected * 1.04, None);
        assert!(!verdict.is_anomalous);

        // Under-billing counts the same as over-billing
        let verdict = classify_anomaly(expected, expected * 0.90, None);
        assert!(verdict.is_anomalous);
    }

    #[test]
    fn test_zero_expected_guards() {
        let verdict = classify_anomaly(0.0, 0.0, None);
        assert!(!verdict.is_anomalous);
        assert_eq!(verdict.deviation_ratio, 0.0);

        let verdict = classify_anomaly(0.0, 500.0, None);
        assert!(verdict.is_anomalous);
        assert_eq!(verdict.deviation_ratio, 1.0);
    }

    #[test]
    fn test_actual_normalized_with_conversion() {
        // Actual reported in source currency at 80 units per USD
        let verdict = classify_anomaly(1_000.0, 80_000.0, Some(80.0));
        assert_eq!(verdict.deviation_ratio, 0.0);
        assert!(!verdict.is_anomalous);
    }

    #[test]
    fn test_report_keeps_system_flag_separate_from_review() {
        let mut report = assess(100_000.0, 112_000.0, None);
        assert!(report.system_flag);
        assert!(report.verdict());

        // An external reviewer may override the reported verdict, but the
        // deterministic flag and numeric anchor stay as computed
        report.review = Some(AnomalyReview {
            is_anomaly: false,
            explanation: "Rate uplift signed in addendum 2".to_string(),
        });
        assert!(!report.verdict());
        assert!(report.system_flag);
        assert_eq!(report.expected_usd, 100_000.0);
    }
}
