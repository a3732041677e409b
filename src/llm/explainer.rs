use crate::anomaly::{AnomalyReport, AnomalyReview};
use crate::error::{BillingError, Result};
use crate::llm::client::GeminiClient;
use crate::llm::prompts::SYSTEM_PROMPT_ANOMALY;
use crate::llm::types::Content;
use crate::schema::{clean_schema, BillingPeriod, BillingResult, MonthlyActuals};
use log::info;
use serde::Serialize;

/// Everything the explanation generator sees for one period: the billing
/// inputs, the computed expectation, the reported actual, and the
/// deterministic hint it may override.
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationRequest<'a> {
    pub contract_id: &'a str,
    pub period: &'a BillingPeriod,
    pub actuals: &'a MonthlyActuals,
    pub billing: &'a BillingResult,
    pub actual_billed_usd: f64,
    pub deviation_ratio: f64,
    pub system_flag: bool,
}

/// Generates a natural-language anomaly review for a billing period.
pub struct AnomalyExplainer {
    client: GeminiClient,
    model: String,
}

impl AnomalyExplainer {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// One request, one response. Failures map to
    /// [`BillingError::ExplanationFailed`]; the caller's deterministic report
    /// is still usable without a review.
    pub async fn review(&self, request: &ExplanationRequest<'_>) -> Result<AnomalyReview> {
        info!(
            "requesting anomaly review for contract {} period {}",
            request.contract_id, request.period.id
        );

        let payload = serde_json::to_string_pretty(request)?;
        let schema = clean_schema(schemars::schema_for!(AnomalyReview))
            .map_err(|e| BillingError::ExplanationFailed(e.to_string()))?;

        let raw_json = self
            .client
            .generate_json(
                &self.model,
                SYSTEM_PROMPT_ANOMALY,
                vec![Content::user(format!(
                    "Review this billing period:\n{}",
                    payload
                ))],
                Some(schema),
            )
            .await
            .map_err(|e| BillingError::ExplanationFailed(e.to_string()))?;

        serde_json::from_str(&raw_json).map_err(|e| {
            BillingError::ExplanationFailed(format!("response did not match schema: {}", e))
        })
    }

    /// Runs the review and attaches it to a deterministic report. The
    /// `system_flag`, deviation, and expected amount in the report stay
    /// exactly as computed; only the `review` slot is filled.
    pub async fn attach_review(
        &self,
        mut report: AnomalyReport,
        contract_id: &str,
        period: &BillingPeriod,
        actuals: &MonthlyActuals,
        billing: &BillingResult,
    ) -> Result<AnomalyReport> {
        let request = ExplanationRequest {
            contract_id,
            period,
            actuals,
            billing,
            actual_billed_usd: report.actual_usd,
            deviation_ratio: report.deviation_ratio,
            system_flag: report.system_flag,
        };

        report.review = Some(self.review(&request).await?);
        Ok(report)
    }
}
