use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days before month start at which Phase 1 opens.
pub const PHASE1_OPENS_DAYS_BEFORE: i64 = 14;
/// Days before month start at which Phase 2 opens.
pub const PHASE2_OPENS_DAYS_BEFORE: i64 = 7;

/// Point in the signup calendar a reference date falls into for a target month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupPhase {
    Phase1,
    Phase2,
    MidMonth,
}

impl SignupPhase {
    pub const fn label(self) -> &'static str {
        match self {
            SignupPhase::Phase1 => "phase 1",
            SignupPhase::Phase2 => "phase 2",
            SignupPhase::MidMonth => "mid-month",
        }
    }
}

/// Classify a reference date against the first day of the target month.
///
/// A boundary day belongs to the stricter phase: exactly 14 days before is
/// Phase 1 and exactly 7 days before is Phase 2.
pub fn determine_phase(reference_date: NaiveDate, month_start: NaiveDate) -> SignupPhase {
    phase_for_days_before((month_start - reference_date).num_days())
}

pub fn phase_for_days_before(days_before: i64) -> SignupPhase {
    if days_before >= PHASE1_OPENS_DAYS_BEFORE {
        SignupPhase::Phase1
    } else if days_before >= PHASE2_OPENS_DAYS_BEFORE {
        SignupPhase::Phase2
    } else {
        SignupPhase::MidMonth
    }
}

/// Reference dates that classify as Phase 2 for the month starting on `month_start`.
pub fn phase2_window(month_start: NaiveDate) -> RangeInclusive<NaiveDate> {
    let first = month_start - Duration::days(PHASE1_OPENS_DAYS_BEFORE - 1);
    let last = month_start - Duration::days(PHASE2_OPENS_DAYS_BEFORE);
    first..=last
}
