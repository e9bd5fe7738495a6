use super::common::*;

use crate::signups::domain::{
    NewShift, Shift, ShiftId, ShiftType, VolunteerId, VolunteerStatus,
};
use crate::signups::repository::{CountProvider, RepositoryError, SignupStore};
use crate::signups::store::InMemorySignupStore;

fn shift(
    store: &InMemorySignupStore,
    day: u32,
    shift_type: ShiftType,
    capacity: u32,
) -> Shift {
    store
        .insert_shift(NewShift {
            date: date(2026, 3, day),
            shift_type,
            capacity,
        })
        .expect("shift stored")
}

fn volunteer(store: &InMemorySignupStore, phone: &str) -> VolunteerId {
    store
        .insert_volunteer(new_volunteer(phone, "Store Volunteer", VolunteerStatus::Approved))
        .expect("volunteer stored")
        .id
}

#[test]
fn month_counts_tally_active_signups_by_type_and_weekday() {
    let store = InMemorySignupStore::new();
    let volunteer_id = volunteer(&store, "15551230001");
    let kakad_thursday = shift(&store, 5, ShiftType::Kakad, 1);
    let robe_monday = shift(&store, 9, ShiftType::Robe, 3);
    let robe_friday = shift(&store, 13, ShiftType::Robe, 3);
    let candidate = shift(&store, 20, ShiftType::Robe, 3);

    store
        .insert_signup(volunteer_id, kakad_thursday.id, phase1_today())
        .unwrap();
    store
        .insert_signup(volunteer_id, robe_monday.id, phase2_today())
        .unwrap();
    let dropped = store
        .insert_signup(volunteer_id, robe_friday.id, phase1_today())
        .unwrap();
    store.drop_signup(dropped.id, phase2_today()).unwrap();

    let counts = store
        .month_counts(volunteer_id, &candidate.details())
        .expect("counts");
    assert_eq!(counts.kakad_count, 1);
    assert_eq!(counts.robe_count, 1);
    assert_eq!(counts.total_count, 2);
    assert_eq!(counts.thursday_count, 1);
    assert_eq!(counts.phase2_window_count, 1);
    assert_eq!(counts.current_shift_occupancy, 0);
    assert_eq!(counts.total_count, counts.kakad_count + counts.robe_count);
}

#[test]
fn month_counts_ignore_other_months_and_volunteers() {
    let store = InMemorySignupStore::new();
    let volunteer_id = volunteer(&store, "15551230001");
    let other = volunteer(&store, "15551230002");
    let april = store
        .insert_shift(NewShift {
            date: date(2026, 4, 2),
            shift_type: ShiftType::Kakad,
            capacity: 1,
        })
        .unwrap();
    let candidate = shift(&store, 3, ShiftType::Robe, 4);

    store.insert_signup(volunteer_id, april.id, phase1_today()).unwrap();
    store.insert_signup(other, candidate.id, phase1_today()).unwrap();

    let counts = store
        .month_counts(volunteer_id, &candidate.details())
        .unwrap();
    assert_eq!(counts.total_count, 0);
    assert_eq!(counts.current_shift_occupancy, 1);
}

#[test]
fn insert_signup_enforces_capacity_and_uniqueness() {
    let store = InMemorySignupStore::new();
    let first = volunteer(&store, "15551230001");
    let second = volunteer(&store, "15551230002");
    let kakad = shift(&store, 2, ShiftType::Kakad, 1);

    store.insert_signup(first, kakad.id, phase1_today()).unwrap();
    assert!(matches!(
        store.insert_signup(first, kakad.id, phase1_today()),
        Err(RepositoryError::Conflict)
    ));
    assert!(matches!(
        store.insert_signup(second, kakad.id, phase1_today()),
        Err(RepositoryError::ShiftFull)
    ));
    assert_eq!(store.shift_occupancy(kakad.id).unwrap(), 1);
}

#[test]
fn dropped_signup_is_reactivated_under_the_same_id() {
    let store = InMemorySignupStore::new();
    let volunteer_id = volunteer(&store, "15551230001");
    let robe = shift(&store, 4, ShiftType::Robe, 3);

    let original = store
        .insert_signup(volunteer_id, robe.id, phase1_today())
        .unwrap();
    let dropped = store.drop_signup(original.id, phase2_today()).unwrap();
    assert_eq!(dropped.dropped_on, Some(phase2_today()));
    assert_eq!(store.shift_occupancy(robe.id).unwrap(), 0);
    assert!(matches!(
        store.drop_signup(original.id, phase2_today()),
        Err(RepositoryError::NotFound)
    ));

    let again = store
        .insert_signup(volunteer_id, robe.id, mid_month_today())
        .unwrap();
    assert_eq!(again.id, original.id);
    assert_eq!(again.signed_up_on, mid_month_today());
    assert!(again.is_active());
    assert_eq!(store.shift_occupancy(robe.id).unwrap(), 1);
}

#[test]
fn duplicate_shift_slots_conflict() {
    let store = InMemorySignupStore::new();
    shift(&store, 6, ShiftType::Kakad, 1);
    let duplicate = store.insert_shift(NewShift {
        date: date(2026, 3, 6),
        shift_type: ShiftType::Kakad,
        capacity: 2,
    });
    assert!(matches!(duplicate, Err(RepositoryError::Conflict)));
}

#[test]
fn removed_volunteers_free_their_phone_number() {
    let store = InMemorySignupStore::new();
    let volunteer_id = volunteer(&store, "15551230001");
    assert!(matches!(
        store.insert_volunteer(new_volunteer(
            "15551230001",
            "Someone Else",
            VolunteerStatus::Approved
        )),
        Err(RepositoryError::Conflict)
    ));

    let mut record = store.volunteer(volunteer_id).unwrap().unwrap();
    record.removed_on = Some(mid_month_today());
    store.update_volunteer(record).unwrap();

    assert!(store.volunteer_by_phone("15551230001").unwrap().is_none());
    let replacement = store
        .insert_volunteer(new_volunteer(
            "15551230001",
            "Someone Else",
            VolunteerStatus::Approved,
        ))
        .unwrap();
    assert_ne!(replacement.id, volunteer_id);
}

#[test]
fn listings_are_sorted_by_date_then_type() {
    let store = InMemorySignupStore::new();
    shift(&store, 3, ShiftType::Robe, 3);
    shift(&store, 2, ShiftType::Robe, 4);
    shift(&store, 3, ShiftType::Kakad, 1);

    let rows = store.shifts_in_month(march()).unwrap();
    let order: Vec<_> = rows.iter().map(|row| (row.date, row.shift_type)).collect();
    assert_eq!(
        order,
        vec![
            (date(2026, 3, 2), ShiftType::Robe),
            (date(2026, 3, 3), ShiftType::Kakad),
            (date(2026, 3, 3), ShiftType::Robe),
        ]
    );
}

#[test]
fn unknown_shift_lookups_are_not_found() {
    let store = InMemorySignupStore::new();
    assert!(matches!(
        store.shift_details(ShiftId(42)),
        Err(RepositoryError::NotFound)
    ));
    assert!(matches!(
        store.shift_occupancy(ShiftId(42)),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn list_volunteers_skips_removed_records() {
    let store = InMemorySignupStore::new();
    let kept = volunteer(&store, "15551230001");
    let gone = volunteer(&store, "15551230002");
    store
        .insert_volunteer(new_volunteer("15551230003", "Waiting", VolunteerStatus::Pending))
        .unwrap();

    let mut record = store.volunteer(gone).unwrap().unwrap();
    record.removed_on = Some(mid_month_today());
    store.update_volunteer(record).unwrap();

    let approved = store
        .list_volunteers(Some(VolunteerStatus::Approved))
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, kept);
    assert_eq!(store.list_volunteers(None).unwrap().len(), 2);
}
