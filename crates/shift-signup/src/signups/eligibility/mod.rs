mod phase;
mod rules;

pub use phase::{
    determine_phase, phase2_window, phase_for_days_before, SignupPhase,
    PHASE1_OPENS_DAYS_BEFORE, PHASE2_OPENS_DAYS_BEFORE,
};
pub use rules::{
    applicable_rules, check, check_capacity, check_kakad_limit, check_phase1_total,
    check_phase2_additional, check_robe_limit, check_running_total, check_thursday_limit,
    QuotaLimits, RuleKind, RuleVerdict,
};

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use tracing::debug;

use super::domain::{ShiftDetails, ShiftId, ShiftType, VolunteerId, YearMonth};
use super::repository::{CountProvider, RepositoryError, VolunteerMonthCounts};

/// The signup under evaluation, assembled from the shift lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSignup {
    pub volunteer_id: VolunteerId,
    pub shift_id: ShiftId,
    pub shift_date: NaiveDate,
    pub shift_type: ShiftType,
    pub shift_capacity: u32,
    pub shift_weekday: Weekday,
    pub reference_date: NaiveDate,
    pub target_month: YearMonth,
}

impl CandidateSignup {
    pub fn new(volunteer_id: VolunteerId, shift: &ShiftDetails, reference_date: NaiveDate) -> Self {
        Self {
            volunteer_id,
            shift_id: shift.shift_id,
            shift_date: shift.date,
            shift_type: shift.shift_type,
            shift_capacity: shift.capacity,
            shift_weekday: shift.weekday,
            reference_date,
            target_month: shift.month,
        }
    }

    pub fn phase(&self) -> SignupPhase {
        determine_phase(self.reference_date, self.target_month.first_day())
    }

    /// Count a quota rule is evaluated against, or `None` when the rule does
    /// not apply to this shift.
    fn count_for(&self, rule: RuleKind, counts: &VolunteerMonthCounts) -> Option<u32> {
        match rule {
            RuleKind::KakadLimit => {
                (self.shift_type == ShiftType::Kakad).then_some(counts.kakad_count)
            }
            RuleKind::RobeLimit => (self.shift_type == ShiftType::Robe).then_some(counts.robe_count),
            RuleKind::ThursdayLimit => {
                (self.shift_weekday == Weekday::Thu).then_some(counts.thursday_count)
            }
            RuleKind::Phase1Total | RuleKind::RunningTotal => Some(counts.total_count),
            RuleKind::Phase2Additional => Some(counts.phase2_window_count),
            RuleKind::Capacity => None,
        }
    }
}

/// Phase plus the ordered violations for one candidate signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityReport {
    pub phase: SignupPhase,
    pub violations: Vec<RuleVerdict>,
}

impl EligibilityReport {
    pub fn allowed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Reason surfaced to the volunteer: the first, most specific violation.
    pub fn first_reason(&self) -> Option<&str> {
        self.violations
            .first()
            .and_then(|verdict| verdict.reason.as_deref())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EligibilityError {
    #[error("shift {0:?} not found")]
    ShiftNotFound(ShiftId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Stateless evaluator that applies the quota limits to live counts.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEngine {
    limits: QuotaLimits,
}

impl EligibilityEngine {
    pub fn new(limits: QuotaLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &QuotaLimits {
        &self.limits
    }

    /// Violations for one candidate signup; empty means allowed.
    pub fn validate_signup<P>(
        &self,
        provider: &P,
        volunteer_id: VolunteerId,
        shift_id: ShiftId,
        reference_date: NaiveDate,
    ) -> Result<Vec<RuleVerdict>, EligibilityError>
    where
        P: CountProvider + ?Sized,
    {
        self.assess(provider, volunteer_id, shift_id, reference_date)
            .map(|report| report.violations)
    }

    pub fn assess<P>(
        &self,
        provider: &P,
        volunteer_id: VolunteerId,
        shift_id: ShiftId,
        reference_date: NaiveDate,
    ) -> Result<EligibilityReport, EligibilityError>
    where
        P: CountProvider + ?Sized,
    {
        let shift = provider.shift_details(shift_id).map_err(|err| match err {
            RepositoryError::NotFound => EligibilityError::ShiftNotFound(shift_id),
            other => EligibilityError::Repository(other),
        })?;

        let candidate = CandidateSignup::new(volunteer_id, &shift, reference_date);
        let phase = candidate.phase();

        let counts = match phase {
            SignupPhase::MidMonth => VolunteerMonthCounts {
                current_shift_occupancy: provider.shift_occupancy(shift_id)?,
                ..VolunteerMonthCounts::default()
            },
            SignupPhase::Phase1 | SignupPhase::Phase2 => {
                provider.month_counts(volunteer_id, &shift)?
            }
        };

        let violations = self.evaluate(&candidate, &counts);
        debug!(
            volunteer = volunteer_id.0,
            shift = shift_id.0,
            phase = phase.label(),
            violations = violations.len(),
            "evaluated signup eligibility"
        );

        Ok(EligibilityReport { phase, violations })
    }

    /// Run the phase's quota rules and the capacity check against `counts`,
    /// keeping only denials. Type caps come before combined caps and capacity
    /// is always last.
    pub fn evaluate(
        &self,
        candidate: &CandidateSignup,
        counts: &VolunteerMonthCounts,
    ) -> Vec<RuleVerdict> {
        let mut verdicts: Vec<RuleVerdict> = applicable_rules(candidate.phase())
            .iter()
            .filter_map(|&rule| {
                let count = candidate.count_for(rule, counts)?;
                let limit = self.limits.limit_for(rule)?;
                Some(check(rule, count, limit))
            })
            .collect();

        verdicts.push(check_capacity(
            counts.current_shift_occupancy,
            candidate.shift_capacity,
        ));

        verdicts.retain(|verdict| !verdict.allowed);
        verdicts
    }
}
