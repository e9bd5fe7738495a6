use chrono::{Datelike, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use shift_signup::signups::{
    applicable_rules, determine_phase, QuotaLimits, RuleKind, SignupPhase, YearMonth,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_month(raw: &str) -> Result<YearMonth, String> {
    raw.parse::<YearMonth>().map_err(|err| err.to_string())
}

/// The month after the one containing `today`.
pub(crate) fn following_month(today: NaiveDate) -> YearMonth {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    YearMonth::new(year, month).unwrap_or_else(|_| YearMonth::of(today))
}

/// Phase in force for `month` as of `today`, with the quotas it enforces.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PhaseSummary {
    pub(crate) month: YearMonth,
    pub(crate) today: NaiveDate,
    pub(crate) days_before: i64,
    pub(crate) phase: SignupPhase,
    pub(crate) rules: Vec<RuleLimit>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct RuleLimit {
    pub(crate) rule: RuleKind,
    pub(crate) reason: &'static str,
    pub(crate) limit: u32,
}

pub(crate) fn phase_summary(
    month: YearMonth,
    today: NaiveDate,
    limits: &QuotaLimits,
) -> PhaseSummary {
    let phase = determine_phase(today, month.first_day());
    let rules = applicable_rules(phase)
        .iter()
        .filter_map(|&rule| {
            limits.limit_for(rule).map(|limit| RuleLimit {
                rule,
                reason: rule.reason(),
                limit,
            })
        })
        .collect();

    PhaseSummary {
        month,
        today,
        days_before: (month.first_day() - today).num_days(),
        phase,
        rules,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_dates_and_months() {
        assert_eq!(
            parse_date(" 2026-02-10 ").unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
        );
        assert!(parse_date("10/02/2026").is_err());
        assert_eq!(parse_month("2026-03").unwrap().to_string(), "2026-03");
        assert!(parse_month("2026-3").is_err());
    }

    #[test]
    fn following_month_rolls_over_the_year() {
        let december = NaiveDate::from_ymd_opt(2026, 12, 20).unwrap();
        assert_eq!(following_month(december).to_string(), "2027-01");
        let march = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        assert_eq!(following_month(march).to_string(), "2026-04");
    }

    #[test]
    fn phase_summary_lists_the_enforced_limits() {
        let month = parse_month("2026-03").unwrap();
        let limits = QuotaLimits::default();

        let early = phase_summary(month, parse_date("2026-02-15").unwrap(), &limits);
        assert_eq!(early.days_before, 14);
        assert_eq!(early.phase, SignupPhase::Phase1);
        assert_eq!(early.rules.len(), 4);
        assert_eq!(early.rules[0].limit, 2);

        let late = phase_summary(month, parse_date("2026-02-16").unwrap(), &limits);
        assert_eq!(late.phase, SignupPhase::Phase2);
        let reasons: Vec<_> = late.rules.iter().map(|rule| rule.reason).collect();
        assert_eq!(reasons, vec!["phase 2 additional limit", "running total"]);

        let open = phase_summary(month, parse_date("2026-03-04").unwrap(), &limits);
        assert_eq!(open.phase, SignupPhase::MidMonth);
        assert!(open.rules.is_empty());
    }
}
