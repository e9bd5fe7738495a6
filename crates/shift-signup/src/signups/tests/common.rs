use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::SignupConfig;
use crate::signups::domain::{
    NewShift, NewVolunteer, Shift, ShiftDetails, ShiftId, ShiftType, Volunteer, VolunteerId,
    VolunteerStatus, YearMonth,
};
use crate::signups::repository::{CountProvider, RepositoryError, VolunteerMonthCounts};
use crate::signups::router::signup_router;
use crate::signups::service::SignupService;
use crate::signups::store::InMemorySignupStore;

/// March 2026 starts on a Sunday; the 5th and 12th are Thursdays.
pub(super) fn march() -> YearMonth {
    YearMonth::new(2026, 3).expect("valid month")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// 19 days before March: Phase 1.
pub(super) fn phase1_today() -> NaiveDate {
    date(2026, 2, 10)
}

/// 9 days before March: Phase 2.
pub(super) fn phase2_today() -> NaiveDate {
    date(2026, 2, 20)
}

/// 4 days before March: mid-month rules already apply.
pub(super) fn mid_month_today() -> NaiveDate {
    date(2026, 2, 25)
}

pub(super) fn shift_details(
    id: u64,
    on: NaiveDate,
    shift_type: ShiftType,
    capacity: u32,
) -> ShiftDetails {
    Shift {
        id: ShiftId(id),
        date: on,
        shift_type,
        capacity,
    }
    .details()
}

/// Count provider returning fixed tallies for a single shift.
pub(super) struct FixedCounts {
    pub(super) shift: ShiftDetails,
    pub(super) counts: VolunteerMonthCounts,
    pub(super) month_count_calls: AtomicUsize,
}

impl FixedCounts {
    pub(super) fn new(shift: ShiftDetails, counts: VolunteerMonthCounts) -> Self {
        Self {
            shift,
            counts,
            month_count_calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn month_count_calls(&self) -> usize {
        self.month_count_calls.load(Ordering::SeqCst)
    }
}

impl CountProvider for FixedCounts {
    fn shift_details(&self, shift_id: ShiftId) -> Result<ShiftDetails, RepositoryError> {
        if shift_id == self.shift.shift_id {
            Ok(self.shift)
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn month_counts(
        &self,
        _volunteer_id: VolunteerId,
        _shift: &ShiftDetails,
    ) -> Result<VolunteerMonthCounts, RepositoryError> {
        self.month_count_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.counts)
    }

    fn shift_occupancy(&self, _shift_id: ShiftId) -> Result<u32, RepositoryError> {
        Ok(self.counts.current_shift_occupancy)
    }
}

/// Count provider whose backing store is offline.
pub(super) struct OfflineCounts;

impl CountProvider for OfflineCounts {
    fn shift_details(&self, _shift_id: ShiftId) -> Result<ShiftDetails, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn month_counts(
        &self,
        _volunteer_id: VolunteerId,
        _shift: &ShiftDetails,
    ) -> Result<VolunteerMonthCounts, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn shift_occupancy(&self, _shift_id: ShiftId) -> Result<u32, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (SignupService<InMemorySignupStore>, Arc<InMemorySignupStore>) {
    let store = Arc::new(InMemorySignupStore::new());
    let service = SignupService::new(store.clone(), SignupConfig::default());
    (service, store)
}

pub(super) fn new_volunteer(phone: &str, name: &str, status: VolunteerStatus) -> NewVolunteer {
    NewVolunteer {
        phone: phone.to_string(),
        name: name.to_string(),
        is_coordinator: false,
        status,
    }
}

pub(super) fn approved_volunteer(
    service: &SignupService<InMemorySignupStore>,
    phone: &str,
) -> Volunteer {
    service
        .register_volunteer(new_volunteer(phone, "Test Volunteer", VolunteerStatus::Approved))
        .expect("volunteer registers")
}

pub(super) fn add_shift(
    service: &SignupService<InMemorySignupStore>,
    on: NaiveDate,
    shift_type: ShiftType,
    capacity: u32,
) -> Shift {
    service
        .create_shift(NewShift {
            date: on,
            shift_type,
            capacity,
        })
        .expect("shift created")
}

/// Create one roomy shift per listed March day and sign `volunteer` up for each.
pub(super) fn hold_shifts(
    service: &SignupService<InMemorySignupStore>,
    volunteer: VolunteerId,
    shift_type: ShiftType,
    days: &[u32],
    today: NaiveDate,
) -> Vec<Shift> {
    days.iter()
        .map(|day| {
            let shift = add_shift(service, date(2026, 3, *day), shift_type, 10);
            service
                .sign_up(volunteer, shift.id, today)
                .expect("setup signup allowed");
            shift
        })
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: SignupService<InMemorySignupStore>) -> axum::Router {
    signup_router(Arc::new(service))
}
