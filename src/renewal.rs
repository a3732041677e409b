use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Lifecycle classification of a contract relative to an evaluation date.
/// Annual renewal cycle assumed: a contract comes due for renewal three
/// months ahead of its end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenewalStatus {
    /// End date has passed.
    Expired,
    /// Not yet expired and ending within the 3-month lookahead window.
    RenewalDue,
    /// Still running, renewal not yet in sight.
    Active,
}

/// Classifies a contract end date against `as_of`. There is no ambient clock
/// anywhere in this crate; callers supply the evaluation date explicitly so
/// results are deterministic.
///
/// Due means `as_of <= end` and `end` is strictly less than three calendar
/// months past `as_of`: an end date 3 months minus a day out is due, 3 months
/// plus a day out is not. Expired and due are mutually exclusive.
pub fn renewal_status(end: NaiveDate, as_of: NaiveDate) -> RenewalStatus {
    if end < as_of {
        return RenewalStatus::Expired;
    }

    let horizon = as_of.checked_add_months(Months::new(3));
    match horizon {
        Some(h) if end < h => RenewalStatus::RenewalDue,
        // An unrepresentable horizon means the end date is far beyond it anyway
        _ => RenewalStatus::Active,
    }
}

pub fn is_renewal_due(end: NaiveDate, as_of: NaiveDate) -> bool {
    renewal_status(end, as_of) == RenewalStatus::RenewalDue
}

pub fn is_expired(end: NaiveDate, as_of: NaiveDate) -> bool {
    renewal_status(end, as_of) == RenewalStatus::Expired
}
