use serde::{Deserialize, Serialize};

use super::phase::SignupPhase;

/// Identifies one quota or capacity constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    KakadLimit,
    RobeLimit,
    ThursdayLimit,
    Phase1Total,
    Phase2Additional,
    RunningTotal,
    Capacity,
}

impl RuleKind {
    /// Fixed reason reported when the rule denies a signup.
    pub const fn reason(self) -> &'static str {
        match self {
            RuleKind::KakadLimit => "kakad limit",
            RuleKind::RobeLimit => "robe limit",
            RuleKind::ThursdayLimit => "thursday limit",
            RuleKind::Phase1Total => "phase 1 total",
            RuleKind::Phase2Additional => "phase 2 additional limit",
            RuleKind::RunningTotal => "running total",
            RuleKind::Capacity => "capacity",
        }
    }

    fn denial_detail(self, count: u32, limit: u32) -> String {
        match self {
            RuleKind::KakadLimit => format!("Kakad limit reached ({count}/{limit})"),
            RuleKind::RobeLimit => format!("Robe limit reached ({count}/{limit})"),
            RuleKind::ThursdayLimit => format!("Thursday limit reached ({count}/{limit})"),
            RuleKind::Phase1Total => format!("Phase 1 total limit reached ({count}/{limit})"),
            RuleKind::Phase2Additional => {
                format!("Phase 2 additional signups limit reached ({count}/{limit})")
            }
            RuleKind::RunningTotal => format!("Running total limit reached ({count}/{limit})"),
            RuleKind::Capacity => format!("Shift is full ({count}/{limit})"),
        }
    }
}

/// Outcome of a single rule check. `reason` is present iff the check denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleVerdict {
    pub rule: RuleKind,
    pub allowed: bool,
    pub reason: Option<String>,
    pub count: u32,
    pub limit: u32,
}

impl RuleVerdict {
    /// Human-readable sentence for end users, e.g. "Kakad limit reached (2/2)".
    pub fn detail(&self) -> Option<String> {
        if self.allowed {
            None
        } else {
            Some(self.rule.denial_detail(self.count, self.limit))
        }
    }
}

/// Per-month quotas. Defaults are the standing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLimits {
    pub kakad: u32,
    pub robe: u32,
    pub thursday: u32,
    pub phase1_total: u32,
    pub phase2_additional: u32,
    pub running_total: u32,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            kakad: 2,
            robe: 4,
            thursday: 1,
            phase1_total: 6,
            phase2_additional: 2,
            running_total: 8,
        }
    }
}

impl QuotaLimits {
    /// Limit for a quota rule; capacity is per shift and has no quota.
    pub fn limit_for(&self, rule: RuleKind) -> Option<u32> {
        match rule {
            RuleKind::KakadLimit => Some(self.kakad),
            RuleKind::RobeLimit => Some(self.robe),
            RuleKind::ThursdayLimit => Some(self.thursday),
            RuleKind::Phase1Total => Some(self.phase1_total),
            RuleKind::Phase2Additional => Some(self.phase2_additional),
            RuleKind::RunningTotal => Some(self.running_total),
            RuleKind::Capacity => None,
        }
    }
}

const PHASE1_RULES: &[RuleKind] = &[
    RuleKind::KakadLimit,
    RuleKind::RobeLimit,
    RuleKind::ThursdayLimit,
    RuleKind::Phase1Total,
];
const PHASE2_RULES: &[RuleKind] = &[RuleKind::Phase2Additional, RuleKind::RunningTotal];

/// Quota rules for a phase, most specific first. Capacity is never listed
/// here; it is checked for every phase.
pub fn applicable_rules(phase: SignupPhase) -> &'static [RuleKind] {
    match phase {
        SignupPhase::Phase1 => PHASE1_RULES,
        SignupPhase::Phase2 => PHASE2_RULES,
        SignupPhase::MidMonth => &[],
    }
}

/// Allowed iff `count < limit`; reaching the limit denies the next unit.
pub fn check(rule: RuleKind, count: u32, limit: u32) -> RuleVerdict {
    let allowed = count < limit;
    RuleVerdict {
        rule,
        allowed,
        reason: (!allowed).then(|| rule.reason().to_string()),
        count,
        limit,
    }
}

pub fn check_kakad_limit(kakad_count: u32, limit: u32) -> RuleVerdict {
    check(RuleKind::KakadLimit, kakad_count, limit)
}

pub fn check_robe_limit(robe_count: u32, limit: u32) -> RuleVerdict {
    check(RuleKind::RobeLimit, robe_count, limit)
}

pub fn check_thursday_limit(thursday_count: u32, limit: u32) -> RuleVerdict {
    check(RuleKind::ThursdayLimit, thursday_count, limit)
}

pub fn check_phase1_total(total_count: u32, limit: u32) -> RuleVerdict {
    check(RuleKind::Phase1Total, total_count, limit)
}

pub fn check_phase2_additional(phase2_window_count: u32, limit: u32) -> RuleVerdict {
    check(RuleKind::Phase2Additional, phase2_window_count, limit)
}

pub fn check_running_total(total_count: u32, limit: u32) -> RuleVerdict {
    check(RuleKind::RunningTotal, total_count, limit)
}

pub fn check_capacity(current_occupancy: u32, capacity: u32) -> RuleVerdict {
    check(RuleKind::Capacity, current_occupancy, capacity)
}
