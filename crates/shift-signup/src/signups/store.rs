use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Weekday};

use super::domain::{
    NewShift, NewVolunteer, Shift, ShiftAvailability, ShiftDetails, ShiftId, ShiftType, Signup,
    SignupId, Volunteer, VolunteerId, VolunteerShift, VolunteerStatus, YearMonth,
};
use super::eligibility::phase2_window;
use super::repository::{CountProvider, RepositoryError, SignupStore, VolunteerMonthCounts};

/// Single-process store; every read and write holds one lock, so counts taken
/// within a call always come from the same snapshot.
#[derive(Debug, Default)]
pub struct InMemorySignupStore {
    state: Mutex<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    volunteers: BTreeMap<VolunteerId, Volunteer>,
    shifts: BTreeMap<ShiftId, Shift>,
    signups: BTreeMap<SignupId, Signup>,
    next_volunteer: u64,
    next_shift: u64,
    next_signup: u64,
}

impl StoreState {
    fn occupancy(&self, shift_id: ShiftId) -> u32 {
        let active = self
            .signups
            .values()
            .filter(|signup| signup.shift_id == shift_id && signup.is_active())
            .count();
        u32::try_from(active).unwrap_or(u32::MAX)
    }

    fn active_for_volunteer_in(
        &self,
        volunteer_id: VolunteerId,
        month: YearMonth,
    ) -> impl Iterator<Item = (&Signup, &Shift)> + '_ {
        self.signups
            .values()
            .filter(move |signup| signup.volunteer_id == volunteer_id && signup.is_active())
            .filter_map(move |signup| {
                self.shifts
                    .get(&signup.shift_id)
                    .map(|shift| (signup, shift))
            })
            .filter(move |(_, shift)| month.contains(shift.date))
    }
}

impl InMemorySignupStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }
}

impl CountProvider for InMemorySignupStore {
    fn shift_details(&self, shift_id: ShiftId) -> Result<ShiftDetails, RepositoryError> {
        let state = self.lock()?;
        state
            .shifts
            .get(&shift_id)
            .map(Shift::details)
            .ok_or(RepositoryError::NotFound)
    }

    fn month_counts(
        &self,
        volunteer_id: VolunteerId,
        shift: &ShiftDetails,
    ) -> Result<VolunteerMonthCounts, RepositoryError> {
        let state = self.lock()?;
        let window = phase2_window(shift.month.first_day());
        let mut counts = VolunteerMonthCounts {
            current_shift_occupancy: state.occupancy(shift.shift_id),
            ..VolunteerMonthCounts::default()
        };

        for (signup, held) in state.active_for_volunteer_in(volunteer_id, shift.month) {
            match held.shift_type {
                ShiftType::Kakad => counts.kakad_count += 1,
                ShiftType::Robe => counts.robe_count += 1,
            }
            counts.total_count += 1;
            if held.details().weekday == Weekday::Thu {
                counts.thursday_count += 1;
            }
            if window.contains(&signup.signed_up_on) {
                counts.phase2_window_count += 1;
            }
        }

        Ok(counts)
    }

    fn shift_occupancy(&self, shift_id: ShiftId) -> Result<u32, RepositoryError> {
        let state = self.lock()?;
        if !state.shifts.contains_key(&shift_id) {
            return Err(RepositoryError::NotFound);
        }
        Ok(state.occupancy(shift_id))
    }
}

impl SignupStore for InMemorySignupStore {
    fn insert_volunteer(&self, volunteer: NewVolunteer) -> Result<Volunteer, RepositoryError> {
        let mut state = self.lock()?;
        if state
            .volunteers
            .values()
            .any(|existing| existing.is_active() && existing.phone == volunteer.phone)
        {
            return Err(RepositoryError::Conflict);
        }

        state.next_volunteer += 1;
        let record = Volunteer {
            id: VolunteerId(state.next_volunteer),
            phone: volunteer.phone,
            name: volunteer.name,
            is_coordinator: volunteer.is_coordinator,
            status: volunteer.status,
            removed_on: None,
        };
        state.volunteers.insert(record.id, record.clone());
        Ok(record)
    }

    fn volunteer(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.volunteers.get(&id).cloned())
    }

    fn volunteer_by_phone(&self, phone: &str) -> Result<Option<Volunteer>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .volunteers
            .values()
            .find(|volunteer| volunteer.is_active() && volunteer.phone == phone)
            .cloned())
    }

    fn update_volunteer(&self, volunteer: Volunteer) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        match state.volunteers.get_mut(&volunteer.id) {
            Some(existing) => {
                *existing = volunteer;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn list_volunteers(
        &self,
        status: Option<VolunteerStatus>,
    ) -> Result<Vec<Volunteer>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .volunteers
            .values()
            .filter(|volunteer| volunteer.is_active())
            .filter(|volunteer| status.map_or(true, |wanted| volunteer.status == wanted))
            .cloned()
            .collect())
    }

    fn insert_shift(&self, shift: NewShift) -> Result<Shift, RepositoryError> {
        let mut state = self.lock()?;
        if state
            .shifts
            .values()
            .any(|existing| existing.date == shift.date && existing.shift_type == shift.shift_type)
        {
            return Err(RepositoryError::Conflict);
        }

        state.next_shift += 1;
        let record = Shift {
            id: ShiftId(state.next_shift),
            date: shift.date,
            shift_type: shift.shift_type,
            capacity: shift.capacity,
        };
        state.shifts.insert(record.id, record.clone());
        Ok(record)
    }

    fn shift(&self, id: ShiftId) -> Result<Option<Shift>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.shifts.get(&id).cloned())
    }

    fn shifts_in_month(&self, month: YearMonth) -> Result<Vec<ShiftAvailability>, RepositoryError> {
        let state = self.lock()?;
        let mut rows: Vec<ShiftAvailability> = state
            .shifts
            .values()
            .filter(|shift| month.contains(shift.date))
            .map(|shift| ShiftAvailability {
                shift_id: shift.id,
                date: shift.date,
                shift_type: shift.shift_type,
                capacity: shift.capacity,
                signup_count: state.occupancy(shift.id),
            })
            .collect();
        rows.sort_by_key(|row| (row.date, row.shift_type));
        Ok(rows)
    }

    fn insert_signup(
        &self,
        volunteer_id: VolunteerId,
        shift_id: ShiftId,
        signed_up_on: NaiveDate,
    ) -> Result<Signup, RepositoryError> {
        let mut state = self.lock()?;
        let capacity = state
            .shifts
            .get(&shift_id)
            .map(|shift| shift.capacity)
            .ok_or(RepositoryError::NotFound)?;
        if !state.volunteers.contains_key(&volunteer_id) {
            return Err(RepositoryError::NotFound);
        }

        let existing = state
            .signups
            .values()
            .find(|signup| signup.volunteer_id == volunteer_id && signup.shift_id == shift_id)
            .map(|signup| (signup.id, signup.is_active()));

        if let Some((_, true)) = existing {
            return Err(RepositoryError::Conflict);
        }
        if state.occupancy(shift_id) >= capacity {
            return Err(RepositoryError::ShiftFull);
        }

        let id = match existing {
            Some((id, _)) => id,
            None => {
                state.next_signup += 1;
                SignupId(state.next_signup)
            }
        };
        let record = Signup {
            id,
            volunteer_id,
            shift_id,
            signed_up_on,
            dropped_on: None,
        };
        state.signups.insert(id, record.clone());
        Ok(record)
    }

    fn drop_signup(&self, id: SignupId, dropped_on: NaiveDate) -> Result<Signup, RepositoryError> {
        let mut state = self.lock()?;
        match state.signups.get_mut(&id) {
            Some(signup) if signup.is_active() => {
                signup.dropped_on = Some(dropped_on);
                Ok(signup.clone())
            }
            _ => Err(RepositoryError::NotFound),
        }
    }

    fn signup(&self, id: SignupId) -> Result<Option<Signup>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.signups.get(&id).cloned())
    }

    fn active_signup_for(
        &self,
        volunteer_id: VolunteerId,
        shift_id: ShiftId,
    ) -> Result<Option<Signup>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .signups
            .values()
            .find(|signup| {
                signup.volunteer_id == volunteer_id
                    && signup.shift_id == shift_id
                    && signup.is_active()
            })
            .cloned())
    }

    fn active_signups(
        &self,
        volunteer_id: VolunteerId,
        month: YearMonth,
    ) -> Result<Vec<VolunteerShift>, RepositoryError> {
        let state = self.lock()?;
        let mut rows: Vec<VolunteerShift> = state
            .active_for_volunteer_in(volunteer_id, month)
            .map(|(signup, shift)| VolunteerShift {
                signup_id: signup.id,
                shift_id: shift.id,
                date: shift.date,
                shift_type: shift.shift_type,
                capacity: shift.capacity,
                signed_up_on: signup.signed_up_on,
            })
            .collect();
        rows.sort_by_key(|row| (row.date, row.shift_type));
        Ok(rows)
    }
}
