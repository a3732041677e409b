use crate::schema::BillingRate;

/// Resolves the applicable monthly rate for `target_year`: among entries with
/// `year <= target_year`, the one with the largest year wins. A contract rolls
/// into future years on its most recent known rate without needing an explicit
/// entry per year.
///
/// Returns 0.0 when no entry qualifies. Callers treat a zero rate as "no
/// billable amount" so totals degrade instead of the whole computation
/// aborting. Never returns a rate from a year later than the target.
pub fn resolve_rate(rates: &[BillingRate], target_year: i32) -> f64 {
    rates
        .iter()
        .filter(|r| r.year <= target_year)
        .max_by_key(|r| r.year)
        .map(|r| r.rate_per_resource)
        .unwrap_or(0.0)
}
