//! # SOW Billing Engine
//!
//! A library for tracking vendor Statements of Work (SOWs): contract
//! metadata, renewal deadlines, and monthly billing expectations derived from
//! working days, regional holidays, and per-resource leave.
//!
//! ## Core Concepts
//!
//! - **Billing period**: one invoicing window on a 26th-to-25th monthly
//!   cycle, clipped to the contract's active span at the boundaries
//! - **Billing rate**: a contracted monthly amount per resource for a given
//!   year, normalized to a 21-working-day month; the most recent rate at or
//!   before the target year applies
//! - **Billable day**: a working day not consumed by a regional holiday or an
//!   individual resource's leave
//! - **Anomaly**: a reported amount deviating more than 5% from the computed
//!   expectation; the deterministic flag stays separate from any external
//!   reviewer's verdict
//!
//! All computations are pure and synchronous; evaluation dates are explicit
//! parameters, never read from a clock. Conversion rates are source-currency
//! units per 1 USD (conversion divides), applied uniformly.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sow_billing_engine::*;
//! use chrono::NaiveDate;
//!
//! let contract = Contract {
//!     id: "sow-001".to_string(),
//!     project: "Data Platform".to_string(),
//!     vendor: "Acme Consulting".to_string(),
//!     vendor_manager: "R. Iyer".to_string(),
//!     client_manager: "M. Chen".to_string(),
//!     po_number: Some("PO-7781".to_string()),
//!     start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
//!     resources: 3,
//!     rates: vec![BillingRate { year: 2024, rate_per_resource: 120_000.0 }],
//! };
//!
//! let schedule = compute_billing_schedule(
//!     &contract,
//!     &ScheduleOverrides::default(),
//!     Some(82.5),
//! ).unwrap();
//! ```

pub mod anomaly;
pub mod billing;
pub mod calendar;
pub mod error;
pub mod overrides;
pub mod periods;
pub mod rates;
pub mod renewal;
pub mod rollup;
pub mod schema;
pub mod store;

#[cfg(feature = "gemini")]
pub mod llm;

pub use anomaly::{
    assess, classify_anomaly, AnomalyReport, AnomalyReview, AnomalyVerdict, DEVIATION_THRESHOLD,
};
pub use billing::{
    compute_monthly_billing, quick_estimate, to_usd, NORMALIZED_WORKING_DAYS,
};
pub use calendar::{working_days, DateRange};
pub use error::{BillingError, Result};
pub use overrides::{PeriodOverride, ScheduleOverrides};
pub use periods::{default_actuals, generate_billing_periods};
pub use rates::resolve_rate;
pub use renewal::{is_expired, is_renewal_due, renewal_status, RenewalStatus};
pub use rollup::{aggregate_by_manager, RollupColumn, RollupRow, RollupTable};
pub use schema::*;
pub use store::{ContractStore, MemoryStore, StoreEvent};

use log::{debug, info};

/// One line of a contract's billed schedule: the period, the merged actuals
/// it was computed with, and the resulting expectation.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodBilling {
    pub period: BillingPeriod,
    pub actuals: MonthlyActuals,
    pub result: BillingResult,
}

pub struct BillingProcessor;

impl BillingProcessor {
    /// Produces the contract's full billed schedule, most recent period
    /// first: the generated period skeletons, user overrides merged on top,
    /// and the expected amount per period.
    pub fn schedule(
        contract: &Contract,
        overrides: &ScheduleOverrides,
        conversion_rate: Option<f64>,
    ) -> Result<Vec<PeriodBilling>> {
        contract.validate()?;

        info!(
            "computing billing schedule for contract {} ({} - {})",
            contract.id, contract.start, contract.end
        );

        let skeleton = default_actuals(contract);
        let schedule: Vec<PeriodBilling> = generate_billing_periods(contract)
            .into_iter()
            .map(|period| {
                let actuals = overrides.apply(&period.id, &skeleton);
                let result = compute_monthly_billing(contract, &period, &actuals, conversion_rate);
                PeriodBilling {
                    period,
                    actuals,
                    result,
                }
            })
            .collect();

        debug!(
            "contract {} has {} billing period(s), {} with overrides",
            contract.id,
            schedule.len(),
            overrides.periods.len()
        );

        Ok(schedule)
    }
}

pub fn compute_billing_schedule(
    contract: &Contract,
    overrides: &ScheduleOverrides,
    conversion_rate: Option<f64>,
) -> Result<Vec<PeriodBilling>> {
    BillingProcessor::schedule(contract, overrides, conversion_rate)
}
