use crate::calendar::DateRange;
use crate::schema::{BillingPeriod, Contract, MonthlyActuals, ResourceLeave};
use chrono::{Datelike, NaiveDate};

/// Day of month on which a new billing window opens. The invoicing cycle runs
/// from the 26th of one month through the 25th of the next, so a date on or
/// after the 26th belongs to the following month's window.
const CYCLE_OPEN_DAY: u32 = 26;

pub(crate) fn billing_month_of(date: NaiveDate) -> (i32, u32) {
    if date.day() >= CYCLE_OPEN_DAY {
        if date.month() == 12 {
            (date.year() + 1, 1)
        } else {
            (date.year(), date.month() + 1)
        }
    } else {
        (date.year(), date.month())
    }
}

pub(crate) fn cycle_window(year: i32, month: u32) -> DateRange {
    let (prev_year, prev_month) = if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    };

    DateRange::new(
        NaiveDate::from_ymd_opt(prev_year, prev_month, CYCLE_OPEN_DAY).unwrap(),
        NaiveDate::from_ymd_opt(year, month, CYCLE_OPEN_DAY - 1).unwrap(),
    )
}

/// Enumerates the contract's monthly billing windows, most recent first.
///
/// Membership follows the 26th-to-25th cycle itself rather than the calendar
/// month, so consecutive windows tile the contract span exactly: clipping each
/// window to `[start, end]` covers every active day once, with no gaps or
/// overlaps at the boundaries. A window that does not overlap the contract
/// span at all is dropped.
pub fn generate_billing_periods(contract: &Contract) -> Vec<BillingPeriod> {
    let span = contract.span();
    if span.is_empty() {
        return Vec::new();
    }

    let (mut year, mut month) = billing_month_of(contract.start);
    let (last_year, last_month) = billing_month_of(contract.end);

    let mut periods = Vec::new();
    while (year, month) <= (last_year, last_month) {
        let window = cycle_window(year, month);
        if window.overlap(&span).is_some() {
            periods.push(BillingPeriod {
                id: format!("{:04}-{:02}", year, month),
                start: window.start,
                end: window.end,
            });
        }

        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    periods.reverse();
    periods
}

/// The editable skeleton for a period's actuals: no holidays, the contract's
/// nominal resource count, and one zero-leave entry per resource. User
/// overrides layer on top of this; it is never recomputed from history.
pub fn default_actuals(contract: &Contract) -> MonthlyActuals {
    MonthlyActuals {
        holidays: 0,
        resource_count: contract.resources,
        leaves: (1..=contract.resources)
            .map(|i| ResourceLeave {
                resource: format!("Resource {}", i),
                leave_days: 0,
            })
            .collect(),
    }
}
