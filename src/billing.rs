use crate::calendar::working_days;
use crate::rates::resolve_rate;
use crate::schema::{BillingPeriod, BillingResult, Contract, MonthlyActuals};
use chrono::Datelike;
use log::debug;

/// A monthly rate is defined to cover exactly 21 working days, regardless of
/// how many working days any real month has.
pub const NORMALIZED_WORKING_DAYS: f64 = 21.0;

/// Converts a source-currency amount to USD.
///
/// Convention, applied uniformly across the crate: a conversion rate is
/// *source-currency units per 1 USD*, so conversion divides. A missing, zero,
/// or negative rate means "no conversion" and the source amount passes
/// through unchanged.
pub fn to_usd(amount_source: f64, conversion_rate: Option<f64>) -> f64 {
    match conversion_rate {
        Some(rate) if rate > 0.0 => amount_source / rate,
        _ => amount_source,
    }
}

/// Computes the expected billing for one period.
///
/// The period window is clipped to the contract span first, so a period
/// straddling contract start or end is prorated to the days the contract is
/// actually active. Day counts saturate at zero: no holiday or leave input
/// can drive an intermediate value negative. Only the first
/// `actuals.resource_count` leave entries are honored; missing entries count
/// as zero leave. The rate is resolved against the period's end-date year.
pub fn compute_monthly_billing(
    contract: &Contract,
    period: &BillingPeriod,
    actuals: &MonthlyActuals,
    conversion_rate: Option<f64>,
) -> BillingResult {
    let effective = period.window().clip(&contract.span());
    let base_days = working_days(effective.start, effective.end);

    let monthly_rate = resolve_rate(&contract.rates, period.end.year());
    let daily_rate = monthly_rate / NORMALIZED_WORKING_DAYS;

    let effective_days = base_days.saturating_sub(actuals.holidays);

    let billable_days_per_resource: Vec<u32> = (0..actuals.resource_count as usize)
        .map(|i| {
            let leave = actuals.leaves.get(i).map(|l| l.leave_days).unwrap_or(0);
            effective_days.saturating_sub(leave)
        })
        .collect();

    let total_billable_days: u32 = billable_days_per_resource.iter().sum();
    let expected_source = f64::from(total_billable_days) * daily_rate;

    debug!(
        "period {}: {} base days, {} effective, {} billable resource-days at {:.2}/day",
        period.id, base_days, effective_days, total_billable_days, daily_rate
    );

    BillingResult {
        expected_source,
        expected_usd: to_usd(expected_source, conversion_rate),
        daily_rate,
        effective_days_per_resource: effective_days,
        billable_days_per_resource,
        total_billable_days,
    }
}

/// Coarse at-a-glance estimate for one period, without leave adjustment:
/// `effective_days * resource_count * daily_rate`, in source currency.
///
/// This is a preview only. The leave-adjusted amount from
/// [`compute_monthly_billing`] is the authoritative figure for billing.
pub fn quick_estimate(
    contract: &Contract,
    period: &BillingPeriod,
    holidays: u32,
    resource_count: u32,
) -> f64 {
    let effective = period.window().clip(&contract.span());
    let base_days = working_days(effective.start, effective.end);
    let effective_days = base_days.saturating_sub(holidays);

    let daily_rate = resolve_rate(&contract.rates, period.end.year()) / NORMALIZED_WORKING_DAYS;
    f64::from(effective_days) * f64::from(resource_count) * daily_rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BillingRate, ResourceLeave};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn contract(resources: u32) -> Contract {
        Contract {
            id: "sow-b".to_string(),
            project: "Platform".to_string(),
            vendor: "Acme".to_string(),
            vendor_manager: "V".to_string(),
            client_manager: "C".to_string(),
            po_number: None,
            start: d(2023, 6, 1),
            end: d(2024, 12, 31),
            resources,
            rates: vec![BillingRate {
                year: 2024,
                rate_per_resource: 120_000.0,
            }],
        }
    }

    // Mon Jan 1 2024 - Mon Jan 29 2024 contains exactly 21 working days
    fn normalized_period() -> BillingPeriod {
        BillingPeriod {
            id: "2024-01".to_string(),
            start: d(2024, 1, 1),
            end: d(2024, 1, 29),
        }
    }

    fn actuals(resource_count: u32, leaves: Vec<ResourceLeave>) -> MonthlyActuals {
        MonthlyActuals {
            holidays: 0,
            resource_count,
            leaves,
        }
    }

    #[test]
    fn test_full_month_single_resource_recovers_monthly_rate() {
        let result = compute_monthly_billing(
            &contract(1),
            &normalized_period(),
            &actuals(
                1,
                vec![ResourceLeave {
                    resource: "Resource 1".to_string(),
                    leave_days: 0,
                }],
            ),
            None,
        );

        assert!((result.daily_rate - 120_000.0 / 21.0).abs() < 0.01);
        assert_eq!(result.effective_days_per_resource, 21);
        assert_eq!(result.total_billable_days, 21);
        assert!((result.expected_source - 120_000.0).abs() < 0.01);
        // No conversion rate: USD figure passes through
        assert_eq!(result.expected_usd, result.expected_source);
    }

    #[test]
    fn test_holidays_reduce_effective_days() {
        let mut inputs = actuals(1, vec![]);
        inputs.holidays = 2;

        let result = compute_monthly_billing(&contract(1), &normalized_period(), &inputs, None);
        assert_eq!(result.effective_days_per_resource, 19);
        assert!((result.expected_source - 19.0 * (120_000.0 / 21.0)).abs() < 0.01);
        assert!((result.expected_source - 108_571.43).abs() < 0.01);
    }

    #[test]
    fn test_leave_adjustment_per_resource() {
        let leaves = vec![
            ResourceLeave {
                resource: "Resource 1".to_string(),
                leave_days: 3,
            },
            ResourceLeave {
                resource: "Resource 2".to_string(),
                leave_days: 0,
            },
        ];

        let result =
            compute_monthly_billing(&contract(2), &normalized_period(), &actuals(2, leaves), None);
        assert_eq!(result.billable_days_per_resource, vec![18, 21]);
        assert_eq!(result.total_billable_days, 39);
        assert!((result.expected_source - 39.0 * (120_000.0 / 21.0)).abs() < 0.01);
    }

    #[test]
    fn test_extra_leave_entries_ignored_missing_treated_as_zero() {
        // Three leave entries but only 2 resources billed: third entry ignored
        let leaves = vec![
            ResourceLeave {
                resource: "Resource 1".to_string(),
                leave_days: 1,
            },
            ResourceLeave {
                resource: "Resource 2".to_string(),
                leave_days: 2,
            },
            ResourceLeave {
                resource: "Resource 3".to_string(),
                leave_days: 21,
            },
        ];
        let result = compute_monthly_billing(
            &contract(2),
            &normalized_period(),
            &actuals(2, leaves),
            None,
        );
        assert_eq!(result.billable_days_per_resource, vec![20, 19]);

        // Two resources billed but only one leave entry: missing entry = no leave
        let result = compute_monthly_billing(
            &contract(2),
            &normalized_period(),
            &actuals(
                2,
                vec![ResourceLeave {
                    resource: "Resource 1".to_string(),
                    leave_days: 5,
                }],
            ),
            None,
        );
        assert_eq!(result.billable_days_per_resource, vec![16, 21]);
    }

    #[test]
    fn test_day_counts_clamp_at_zero() {
        let mut inputs = actuals(
            1,
            vec![ResourceLeave {
                resource: "Resource 1".to_string(),
                leave_days: 500,
            }],
        );
        inputs.holidays = 99;

        let result = compute_monthly_billing(&contract(1), &normalized_period(), &inputs, None);
        assert_eq!(result.effective_days_per_resource, 0);
        assert_eq!(result.total_billable_days, 0);
        assert_eq!(result.expected_source, 0.0);
    }

    #[test]
    fn test_partial_period_is_prorated() {
        // Contract ends Jan 12; the window clips to Jan 1 - Jan 12
        let mut c = contract(1);
        c.end = d(2024, 1, 12);

        let result = compute_monthly_billing(
            &c,
            &normalized_period(),
            &actuals(1, vec![]),
            None,
        );
        // Jan 1 (Mon) - Jan 12 (Fri): two full working weeks
        assert_eq!(result.effective_days_per_resource, 10);
    }

    #[test]
    fn test_missing_rate_degrades_to_zero_amount() {
        let mut c = contract(1);
        c.rates = vec![BillingRate {
            year: 2025,
            rate_per_resource: 140_000.0,
        }];

        let result =
            compute_monthly_billing(&c, &normalized_period(), &actuals(1, vec![]), None);
        assert_eq!(result.daily_rate, 0.0);
        assert_eq!(result.expected_source, 0.0);
        // Day counts still computed so the schedule stays renderable
        assert_eq!(result.effective_days_per_resource, 21);
    }

    #[test]
    fn test_usd_conversion_divides() {
        let result = compute_monthly_billing(
            &contract(1),
            &normalized_period(),
            &actuals(1, vec![]),
            Some(80.0),
        );
        assert!((result.expected_usd - result.expected_source / 80.0).abs() < 0.01);
    }

    #[test]
    fn test_zero_or_negative_conversion_rate_skips_conversion() {
        assert_eq!(to_usd(1000.0, Some(0.0)), 1000.0);
        assert_eq!(to_usd(1000.0, Some(-5.0)), 1000.0);
        assert_eq!(to_usd(1000.0, None), 1000.0);
        assert_eq!(to_usd(1000.0, Some(4.0)), 250.0);
    }

    #[test]
    fn test_quick_estimate_skips_leave() {
        let c = contract(2);
        let period = normalized_period();
        let leaves = vec![ResourceLeave {
            resource: "Resource 1".to_string(),
            leave_days: 5,
        }];

        let preview = quick_estimate(&c, &period, 0, 2);
        let adjusted =
            compute_monthly_billing(&c, &period, &actuals(2, leaves), None).expected_source;

        assert!((preview - 2.0 * 120_000.0).abs() < 0.01);
        assert!(preview > adjusted);
    }
}
