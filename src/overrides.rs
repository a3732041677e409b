use crate::schema::{MonthlyActuals, ResourceLeave};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Edits recorded against one billing period. Only the fields present replace
/// the generated values; everything else falls through to the skeleton.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PeriodOverride {
    #[serde(default)]
    pub holidays: Option<u32>,

    #[serde(default)]
    pub resource_count: Option<u32>,

    #[serde(default)]
    pub leaves: Option<Vec<ResourceLeave>>,
}

/// User edits layered over the generated per-period skeletons, keyed by
/// period id ("YYYY-MM").
///
/// Applying overrides never mutates the base actuals: recomputation from the
/// same skeleton and the same overrides is always reproducible, and the
/// skeleton itself is never rebuilt from edited state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScheduleOverrides {
    #[serde(default)]
    pub periods: BTreeMap<String, PeriodOverride>,
}

impl ScheduleOverrides {
    pub fn set(&mut self, period_id: impl Into<String>, edit: PeriodOverride) {
        self.periods.insert(period_id.into(), edit);
    }

    pub fn clear(&mut self, period_id: &str) {
        self.periods.remove(period_id);
    }

    /// Returns the effective actuals for a period: the base skeleton with any
    /// recorded edits for `period_id` layered on top.
    pub fn apply(&self, period_id: &str, base: &MonthlyActuals) -> MonthlyActuals {
        let mut actuals = base.clone();

        if let Some(edit) = self.periods.get(period_id) {
            if let Some(holidays) = edit.holidays {
                actuals.holidays = holidays;
            }
            if let Some(count) = edit.resource_count {
                actuals.resource_count = count;
            }
            if let Some(leaves) = &edit.leaves {
                actuals.leaves = leaves.clone();
            }
        }

        actuals
    }
}
