use crate::error::{BillingError, Result};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A contracted monthly rate per resource for a given year, in the contract's
/// source currency. The amount is normalized to a 21-working-day month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BillingRate {
    #[schemars(description = "Calendar year this rate applies from (e.g., 2024)")]
    pub year: i32,

    #[schemars(
        description = "Monthly amount billed per resource in the contract's source currency, covering a normalized 21-working-day month"
    )]
    pub rate_per_resource: f64,
}

/// A vendor Statement of Work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub project: String,
    pub vendor: String,
    /// Vendor-side delivery manager.
    pub vendor_manager: String,
    /// Client-side manager who owns the contract; rollups group by this field.
    pub client_manager: String,
    pub po_number: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Nominal number of contracted resources.
    pub resources: u32,
    /// Rate history ordered by year; years must be unique.
    pub rates: Vec<BillingRate>,
}

impl Contract {
    pub fn span(&self) -> crate::calendar::DateRange {
        crate::calendar::DateRange::new(self.start, self.end)
    }

    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(BillingError::ValidationError {
                contract: self.id.clone(),
                details: format!("end date {} before start date {}", self.end, self.start),
            });
        }

        if self.resources == 0 {
            return Err(BillingError::ValidationError {
                contract: self.id.clone(),
                details: "contracted resource count must be at least 1".to_string(),
            });
        }

        let mut years: Vec<i32> = self.rates.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        if years.len() != self.rates.len() {
            return Err(BillingError::ValidationError {
                contract: self.id.clone(),
                details: "duplicate billing-rate year".to_string(),
            });
        }

        for rate in &self.rates {
            if rate.rate_per_resource < 0.0 {
                return Err(BillingError::ValidationError {
                    contract: self.id.clone(),
                    details: format!(
                        "negative rate {} for year {}",
                        rate.rate_per_resource, rate.year
                    ),
                });
            }
        }

        Ok(())
    }
}

/// One monthly invoicing window on the 26th-to-25th cycle. Derived from the
/// contract span, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    /// "YYYY-MM" of the month the window ends in.
    pub id: String,
    /// 26th of the prior month.
    pub start: NaiveDate,
    /// 25th of the period month.
    pub end: NaiveDate,
}

impl BillingPeriod {
    pub fn window(&self) -> crate::calendar::DateRange {
        crate::calendar::DateRange::new(self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceLeave {
    pub resource: String,
    pub leave_days: u32,
}

/// Per-period inputs supplied at computation time: holiday count, the resource
/// count actually billed (may differ from the contract's nominal count), and
/// per-resource leave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyActuals {
    pub holidays: u32,
    pub resource_count: u32,
    pub leaves: Vec<ResourceLeave>,
}

/// Output of the monthly billing calculator. Always a pure function of
/// contract + period + actuals + conversion rate; recomputed on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingResult {
    /// Leave-adjusted expected amount in the contract's source currency.
    /// Authoritative for invoice reconciliation.
    pub expected_source: f64,
    /// Same amount converted to USD (source units per 1 USD, divided).
    /// Equals `expected_source` when no usable conversion rate was supplied.
    pub expected_usd: f64,
    pub daily_rate: f64,
    /// Working days in the clipped window minus holidays, before leave.
    pub effective_days_per_resource: u32,
    /// Per-resource billable days after leave, one entry per billed resource.
    pub billable_days_per_resource: Vec<u32>,
    pub total_billable_days: u32,
}

/// Best-effort contract fields extracted from an uploaded document. Any field
/// may be absent; `into_contract` fills the gaps with defaults so manual entry
/// can take over from whatever the extractor managed to find.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedContract {
    #[schemars(description = "Project or engagement name as written in the SOW")]
    pub project: Option<String>,

    #[schemars(description = "Legal name of the vendor organization")]
    pub vendor: Option<String>,

    #[schemars(description = "Vendor-side delivery or engagement manager")]
    pub vendor_manager: Option<String>,

    #[schemars(description = "Client-side manager who owns this contract")]
    pub client_manager: Option<String>,

    #[schemars(description = "Purchase-order number, if the document carries one")]
    pub po_number: Option<String>,

    #[schemars(description = "Contract start date, YYYY-MM-DD")]
    pub start: Option<NaiveDate>,

    #[schemars(description = "Contract end date, YYYY-MM-DD")]
    pub end: Option<NaiveDate>,

    #[schemars(description = "Number of contracted resources (positive integer)")]
    pub resources: Option<u32>,

    #[schemars(
        description = "All billing rates found in the document, one entry per year. Extract only rates explicitly written; do not calculate values."
    )]
    pub rates: Option<Vec<BillingRate>>,
}

impl ExtractedContract {
    /// Builds a contract draft, defaulting every absent field. `as_of` seeds
    /// the date defaults so the draft never reads an ambient clock.
    pub fn into_contract(self, id: impl Into<String>, as_of: NaiveDate) -> Contract {
        let start = self.start.unwrap_or(as_of);
        Contract {
            id: id.into(),
            project: self.project.unwrap_or_default(),
            vendor: self.vendor.unwrap_or_default(),
            vendor_manager: self.vendor_manager.unwrap_or_default(),
            client_manager: self.client_manager.unwrap_or_default(),
            po_number: self.po_number,
            start,
            end: self.end.unwrap_or(start),
            resources: self.resources.unwrap_or(1),
            rates: self.rates.unwrap_or_default(),
        }
    }

    /// Generates a Gemini-compatible JSON schema (no $ref, $schema, or
    /// definitions) for structured extraction output.
    pub fn response_schema() -> serde_json::Result<serde_json::Value> {
        clean_schema(schemars::schema_for!(ExtractedContract))
    }
}

/// Flattens a schemars root schema into the subset the Gemini API accepts:
/// `$ref` entries are replaced by their definitions and the `$schema` /
/// `definitions` / `title` keys are stripped.
pub fn clean_schema(root: schemars::schema::RootSchema) -> serde_json::Result<serde_json::Value> {
    let mut value = serde_json::to_value(&root)?;

    let definitions = value
        .get("definitions")
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));

    inline_refs(&mut value, &definitions);

    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
        obj.remove("definitions");
        obj.remove("title");
    }

    Ok(value)
}

fn inline_refs(value: &mut serde_json::Value, definitions: &serde_json::Value) {
    match value {
        serde_json::Value::Object(obj) => {
            if let Some(reference) = obj.get("$ref").and_then(|r| r.as_str()) {
                let name = reference.trim_start_matches("#/definitions/").to_string();
                if let Some(def) = definitions.get(&name) {
                    let mut resolved = def.clone();
                    inline_refs(&mut resolved, definitions);
                    *value = resolved;
                    return;
                }
            }
            for (_, v) in obj.iter_mut() {
                inline_refs(v, definitions);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}
