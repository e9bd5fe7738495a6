use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    NewShift, NewVolunteer, Shift, ShiftAvailability, ShiftDetails, ShiftId, Signup, SignupId,
    Volunteer, VolunteerId, VolunteerShift, VolunteerStatus, YearMonth,
};

/// Live tallies for one volunteer and month, plus the candidate shift's occupancy.
///
/// Every count excludes dropped signups, and `total_count == kakad_count + robe_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerMonthCounts {
    pub kakad_count: u32,
    pub robe_count: u32,
    pub total_count: u32,
    pub thursday_count: u32,
    pub phase2_window_count: u32,
    pub current_shift_occupancy: u32,
}

/// Read side consumed by the eligibility engine.
///
/// Implementations must compute everything returned by one `month_counts`
/// call from the same snapshot of signups.
pub trait CountProvider: Send + Sync {
    fn shift_details(&self, shift_id: ShiftId) -> Result<ShiftDetails, RepositoryError>;
    fn month_counts(
        &self,
        volunteer_id: VolunteerId,
        shift: &ShiftDetails,
    ) -> Result<VolunteerMonthCounts, RepositoryError>;
    fn shift_occupancy(&self, shift_id: ShiftId) -> Result<u32, RepositoryError>;
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait SignupStore: CountProvider {
    fn insert_volunteer(&self, volunteer: NewVolunteer) -> Result<Volunteer, RepositoryError>;
    fn volunteer(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError>;
    fn volunteer_by_phone(&self, phone: &str) -> Result<Option<Volunteer>, RepositoryError>;
    fn update_volunteer(&self, volunteer: Volunteer) -> Result<(), RepositoryError>;
    /// Volunteers not removed, optionally limited to one status, ordered by id.
    fn list_volunteers(
        &self,
        status: Option<VolunteerStatus>,
    ) -> Result<Vec<Volunteer>, RepositoryError>;

    fn insert_shift(&self, shift: NewShift) -> Result<Shift, RepositoryError>;
    fn shift(&self, id: ShiftId) -> Result<Option<Shift>, RepositoryError>;
    fn shifts_in_month(&self, month: YearMonth) -> Result<Vec<ShiftAvailability>, RepositoryError>;

    /// Store an active signup, reactivating a dropped one for the same pair.
    /// Fails with `Conflict` on an active duplicate and `ShiftFull` at capacity.
    fn insert_signup(
        &self,
        volunteer_id: VolunteerId,
        shift_id: ShiftId,
        signed_up_on: NaiveDate,
    ) -> Result<Signup, RepositoryError>;
    /// Soft-delete an active signup.
    fn drop_signup(&self, id: SignupId, dropped_on: NaiveDate) -> Result<Signup, RepositoryError>;
    fn signup(&self, id: SignupId) -> Result<Option<Signup>, RepositoryError>;
    fn active_signup_for(
        &self,
        volunteer_id: VolunteerId,
        shift_id: ShiftId,
    ) -> Result<Option<Signup>, RepositoryError>;
    fn active_signups(
        &self,
        volunteer_id: VolunteerId,
        month: YearMonth,
    ) -> Result<Vec<VolunteerShift>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("shift is at capacity")]
    ShiftFull,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
