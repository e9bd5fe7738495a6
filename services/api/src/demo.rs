use crate::infra::{following_month, parse_date, parse_month, phase_summary, PhaseSummary};
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use clap::Args;
use shift_signup::config::SignupConfig;
use shift_signup::error::AppError;
use shift_signup::signups::{
    InMemorySignupStore, NewVolunteer, QuotaLimits, ShiftAvailability, ShiftType, SignupService,
    SignupServiceError, VolunteerId, VolunteerStatus, YearMonth,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PhaseArgs {
    /// Target month (YYYY-MM)
    #[arg(long, value_parser = parse_month)]
    pub(crate) month: YearMonth,
    /// Reference date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Month to seed (YYYY-MM). Defaults to the month after `today`.
    #[arg(long, value_parser = parse_month)]
    pub(crate) month: Option<YearMonth>,
    /// Reference date used to pick the default month (defaults to today).
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_phase_report(args: PhaseArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let summary = phase_summary(args.month, today, &QuotaLimits::default());
    render_phase_summary(&summary);
    Ok(())
}

fn render_phase_summary(summary: &PhaseSummary) {
    println!(
        "Signups for {} as of {} ({} days before the month starts)",
        summary.month, summary.today, summary.days_before
    );
    println!("Phase: {}", summary.phase.label());
    if summary.rules.is_empty() {
        println!("Quotas: none (only shift capacity applies)");
        return;
    }
    println!("Quotas:");
    for rule in &summary.rules {
        println!("  - {}: at most {}", rule.reason, rule.limit);
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let month = args.month.unwrap_or_else(|| following_month(today));
    let month_start = month.first_day();

    let phase1 = month_start - Duration::days(20);
    let phase2 = month_start - Duration::days(10);
    let mid_month = month_start - Duration::days(3);

    println!("Volunteer shift signup demo for {month}");
    let service = SignupService::new(
        Arc::new(InMemorySignupStore::new()),
        SignupConfig::default(),
    );
    let created = service.seed_month(month)?;
    println!("- Seeded {created} shifts (one Kakad and one Robe per day)");

    let asha = service.register_volunteer(demo_volunteer("555-010-3001", "Asha", true))?;
    let ravi = service.register_volunteer(NewVolunteer {
        status: VolunteerStatus::Pending,
        ..demo_volunteer("555-010-3002", "Ravi", false)
    })?;
    println!(
        "- Registered {} ({}) and {} ({})",
        asha.name,
        asha.status.label(),
        ravi.name,
        ravi.status.label()
    );

    let shifts = service.month_availability(month)?;
    let kakads = shifts_matching(&shifts, |row| row.shift_type == ShiftType::Kakad);
    let thursday_robes = shifts_matching(&shifts, |row| {
        row.shift_type == ShiftType::Robe && row.date.weekday() == Weekday::Thu
    });

    println!();
    render_phase_summary(&phase_summary(month, phase1, service.engine().limits()));
    attempt(&service, &asha.name, asha.id, kakads[0], phase1)?;
    attempt(&service, &asha.name, asha.id, kakads[1], phase1)?;
    attempt(&service, &asha.name, asha.id, kakads[2], phase1)?;
    attempt(&service, &asha.name, asha.id, thursday_robes[0], phase1)?;
    attempt(&service, &asha.name, asha.id, thursday_robes[1], phase1)?;
    attempt(&service, &ravi.name, ravi.id, kakads[3], phase1)?;
    service.approve_volunteer(ravi.id)?;
    println!("  {} approved by a coordinator", ravi.name);
    attempt(&service, &ravi.name, ravi.id, kakads[3], phase1)?;

    println!();
    render_phase_summary(&phase_summary(month, phase2, service.engine().limits()));
    attempt(&service, &asha.name, asha.id, thursday_robes[1], phase2)?;

    println!();
    render_phase_summary(&phase_summary(month, mid_month, service.engine().limits()));
    attempt(&service, &asha.name, asha.id, kakads[2], mid_month)?;
    attempt(&service, &ravi.name, ravi.id, kakads[0], mid_month)?;

    let held = service.volunteer_shifts(asha.id, month)?;
    println!("\n{} holds {} shifts in {month}:", asha.name, held.len());
    for shift in &held {
        println!(
            "  - {} {} (signed up {})",
            shift.date,
            shift.shift_type.label(),
            shift.signed_up_on
        );
    }

    let gaps = service.coverage_gaps(month)?;
    let open_seats: u32 = gaps.iter().map(|gap| gap.gap_size).sum();
    println!(
        "\nCoordinator view: {} shifts still need volunteers ({} open seats)",
        gaps.len(),
        open_seats
    );

    println!();
    render_phase_summary(&phase_summary(month, today, service.engine().limits()));
    Ok(())
}

fn demo_volunteer(phone: &str, name: &str, is_coordinator: bool) -> NewVolunteer {
    NewVolunteer {
        phone: phone.to_string(),
        name: name.to_string(),
        is_coordinator,
        status: VolunteerStatus::Approved,
    }
}

fn shifts_matching<F>(shifts: &[ShiftAvailability], predicate: F) -> Vec<&ShiftAvailability>
where
    F: Fn(&ShiftAvailability) -> bool,
{
    shifts.iter().filter(|row| predicate(row)).collect()
}

/// Try a signup and print the outcome; only unexpected failures are returned.
fn attempt(
    service: &SignupService<InMemorySignupStore>,
    name: &str,
    volunteer_id: VolunteerId,
    shift: &ShiftAvailability,
    today: NaiveDate,
) -> Result<(), AppError> {
    let label = format!("{} {}", shift.date, shift.shift_type.label());
    match service.sign_up(volunteer_id, shift.shift_id, today) {
        Ok(_) => println!("  {name}: {label} -> signed up"),
        Err(SignupServiceError::Rejected(violations)) => {
            let details: Vec<String> = violations
                .iter()
                .filter_map(|verdict| verdict.detail())
                .collect();
            println!("  {name}: {label} -> rejected ({})", details.join("; "));
        }
        Err(SignupServiceError::NotApproved(_)) => {
            println!("  {name}: {label} -> waiting for coordinator approval");
        }
        Err(SignupServiceError::Duplicate) => {
            println!("  {name}: {label} -> already signed up");
        }
        Err(other) => return Err(other.into()),
    }
    Ok(())
}
