use super::common::*;
use chrono::Duration;

use crate::signups::eligibility::{
    determine_phase, phase2_window, phase_for_days_before, SignupPhase,
};

#[test]
fn boundary_days_belong_to_the_stricter_phase() {
    assert_eq!(phase_for_days_before(14), SignupPhase::Phase1);
    assert_eq!(phase_for_days_before(13), SignupPhase::Phase2);
    assert_eq!(phase_for_days_before(7), SignupPhase::Phase2);
    assert_eq!(phase_for_days_before(6), SignupPhase::MidMonth);
}

#[test]
fn dates_inside_or_after_the_target_month_are_mid_month() {
    assert_eq!(phase_for_days_before(0), SignupPhase::MidMonth);
    assert_eq!(phase_for_days_before(-12), SignupPhase::MidMonth);
    assert_eq!(
        determine_phase(date(2026, 3, 20), march().first_day()),
        SignupPhase::MidMonth
    );
}

#[test]
fn every_offset_maps_to_exactly_one_phase() {
    for days_before in -60..=60 {
        let expected = if days_before >= 14 {
            SignupPhase::Phase1
        } else if days_before >= 7 {
            SignupPhase::Phase2
        } else {
            SignupPhase::MidMonth
        };
        assert_eq!(
            phase_for_days_before(days_before),
            expected,
            "offset {days_before}"
        );
    }
}

#[test]
fn determine_phase_counts_calendar_days_across_month_lengths() {
    let month_start = march().first_day();
    assert_eq!(
        determine_phase(date(2026, 2, 15), month_start),
        SignupPhase::Phase1
    );
    assert_eq!(
        determine_phase(date(2026, 2, 16), month_start),
        SignupPhase::Phase2
    );
    assert_eq!(
        determine_phase(date(2026, 2, 22), month_start),
        SignupPhase::Phase2
    );
    assert_eq!(
        determine_phase(date(2026, 2, 23), month_start),
        SignupPhase::MidMonth
    );
}

#[test]
fn phase2_window_covers_exactly_the_phase2_dates() {
    let month_start = march().first_day();
    let window = phase2_window(month_start);
    assert_eq!(*window.start(), date(2026, 2, 16));
    assert_eq!(*window.end(), date(2026, 2, 22));

    for offset in -40..=40 {
        let reference = month_start + Duration::days(offset);
        let in_window = window.contains(&reference);
        let is_phase2 = determine_phase(reference, month_start) == SignupPhase::Phase2;
        assert_eq!(in_window, is_phase2, "reference {reference}");
    }
}

#[test]
fn phase_labels_are_stable() {
    assert_eq!(SignupPhase::Phase1.label(), "phase 1");
    assert_eq!(SignupPhase::Phase2.label(), "phase 2");
    assert_eq!(SignupPhase::MidMonth.label(), "mid-month");
    assert_eq!(
        serde_json::to_value(SignupPhase::MidMonth).unwrap(),
        serde_json::json!("mid_month")
    );
}
