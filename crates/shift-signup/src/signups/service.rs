use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Datelike, NaiveDate};
use tracing::{info, warn};

use super::domain::{
    NewShift, NewVolunteer, Shift, ShiftAvailability, ShiftGap, ShiftId, ShiftType, Signup,
    SignupId, Volunteer, VolunteerId, VolunteerShift, VolunteerStatus, YearMonth,
};
use super::eligibility::{
    check_capacity, EligibilityEngine, EligibilityError, EligibilityReport, RuleVerdict,
};
use super::repository::{RepositoryError, SignupStore};
use super::roster::normalize_phone;
use crate::config::SignupConfig;

/// Service composing the signup store with the eligibility engine.
pub struct SignupService<S> {
    store: Arc<S>,
    engine: Arc<EligibilityEngine>,
    default_country_code: String,
}

impl<S> SignupService<S>
where
    S: SignupStore + 'static,
{
    pub fn new(store: Arc<S>, config: SignupConfig) -> Self {
        Self {
            store,
            engine: Arc::new(EligibilityEngine::new(config.limits)),
            default_country_code: config.default_country_code,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    pub fn normalize_phone(&self, raw: &str) -> String {
        normalize_phone(raw, &self.default_country_code)
    }

    /// Register a volunteer under a normalized phone number.
    pub fn register_volunteer(
        &self,
        mut volunteer: NewVolunteer,
    ) -> Result<Volunteer, SignupServiceError> {
        volunteer.phone = self.normalize_phone(&volunteer.phone);
        if volunteer.phone.is_empty() {
            return Err(SignupServiceError::InvalidVolunteer(
                "phone number is required".to_string(),
            ));
        }
        if volunteer.name.trim().is_empty() {
            return Err(SignupServiceError::InvalidVolunteer(
                "name is required".to_string(),
            ));
        }

        let record = self
            .store
            .insert_volunteer(volunteer)
            .map_err(|err| match err {
                RepositoryError::Conflict => SignupServiceError::Duplicate,
                other => other.into(),
            })?;
        info!(volunteer = record.id.0, status = record.status.label(), "volunteer registered");
        Ok(record)
    }

    /// Fetch an active volunteer; removed volunteers are reported as missing.
    pub fn volunteer(&self, id: VolunteerId) -> Result<Volunteer, SignupServiceError> {
        self.store
            .volunteer(id)?
            .filter(Volunteer::is_active)
            .ok_or(SignupServiceError::VolunteerNotFound(id))
    }

    pub fn volunteer_by_phone(&self, phone: &str) -> Result<Option<Volunteer>, SignupServiceError> {
        let normalized = self.normalize_phone(phone);
        Ok(self.store.volunteer_by_phone(&normalized)?)
    }

    /// Active volunteers, optionally filtered by status.
    pub fn list_volunteers(
        &self,
        status: Option<VolunteerStatus>,
    ) -> Result<Vec<Volunteer>, SignupServiceError> {
        Ok(self.store.list_volunteers(status)?)
    }

    /// Volunteers waiting for coordinator approval.
    pub fn pending_volunteers(&self) -> Result<Vec<Volunteer>, SignupServiceError> {
        self.list_volunteers(Some(VolunteerStatus::Pending))
    }

    pub fn approve_volunteer(&self, id: VolunteerId) -> Result<Volunteer, SignupServiceError> {
        self.set_status(id, VolunteerStatus::Approved)
    }

    pub fn reject_volunteer(&self, id: VolunteerId) -> Result<Volunteer, SignupServiceError> {
        self.set_status(id, VolunteerStatus::Rejected)
    }

    pub fn remove_volunteer(
        &self,
        id: VolunteerId,
        today: NaiveDate,
    ) -> Result<Volunteer, SignupServiceError> {
        let mut volunteer = self.volunteer(id)?;
        volunteer.removed_on = Some(today);
        self.store.update_volunteer(volunteer.clone())?;
        info!(volunteer = id.0, "volunteer removed");
        Ok(volunteer)
    }

    fn set_status(
        &self,
        id: VolunteerId,
        status: VolunteerStatus,
    ) -> Result<Volunteer, SignupServiceError> {
        let mut volunteer = self.volunteer(id)?;
        volunteer.status = status;
        self.store.update_volunteer(volunteer.clone())?;
        info!(volunteer = id.0, status = status.label(), "volunteer status updated");
        Ok(volunteer)
    }

    pub fn create_shift(&self, shift: NewShift) -> Result<Shift, SignupServiceError> {
        if shift.capacity == 0 {
            return Err(SignupServiceError::InvalidShift(
                "capacity must be at least 1".to_string(),
            ));
        }

        self.store.insert_shift(shift).map_err(|err| match err {
            RepositoryError::Conflict => SignupServiceError::Duplicate,
            other => other.into(),
        })
    }

    pub fn shift(&self, id: ShiftId) -> Result<Shift, SignupServiceError> {
        self.store
            .shift(id)?
            .ok_or(SignupServiceError::ShiftNotFound(id))
    }

    /// Create a Kakad and a Robe shift for every day of `month`, skipping
    /// pairs that already exist. Returns the number created.
    pub fn seed_month(&self, month: YearMonth) -> Result<usize, SignupServiceError> {
        let mut created = 0;
        for date in month.days() {
            for shift_type in [ShiftType::Kakad, ShiftType::Robe] {
                let shift = NewShift {
                    date,
                    shift_type,
                    capacity: shift_type.default_capacity(date.weekday()),
                };
                match self.store.insert_shift(shift) {
                    Ok(_) => created += 1,
                    Err(RepositoryError::Conflict) => {}
                    Err(other) => return Err(other.into()),
                }
            }
        }

        info!(%month, created, "seeded month of shifts");
        Ok(created)
    }

    pub fn month_availability(
        &self,
        month: YearMonth,
    ) -> Result<Vec<ShiftAvailability>, SignupServiceError> {
        Ok(self.store.shifts_in_month(month)?)
    }

    /// Shifts in `month` whose active signups are below capacity.
    pub fn coverage_gaps(&self, month: YearMonth) -> Result<Vec<ShiftGap>, SignupServiceError> {
        Ok(self
            .store
            .shifts_in_month(month)?
            .iter()
            .filter(|row| row.gap() > 0)
            .map(ShiftGap::from)
            .collect())
    }

    /// Evaluate a signup without storing it. The volunteer must exist and be
    /// approved before any rule runs.
    pub fn check_signup(
        &self,
        volunteer_id: VolunteerId,
        shift_id: ShiftId,
        today: NaiveDate,
    ) -> Result<EligibilityReport, SignupServiceError> {
        self.approved_volunteer(volunteer_id)?;
        self.assess(volunteer_id, shift_id, today)
    }

    fn assess(
        &self,
        volunteer_id: VolunteerId,
        shift_id: ShiftId,
        today: NaiveDate,
    ) -> Result<EligibilityReport, SignupServiceError> {
        Ok(self
            .engine
            .assess(self.store.as_ref(), volunteer_id, shift_id, today)?)
    }

    fn approved_volunteer(&self, id: VolunteerId) -> Result<Volunteer, SignupServiceError> {
        let volunteer = self.volunteer(id)?;
        if volunteer.status != VolunteerStatus::Approved {
            return Err(SignupServiceError::NotApproved(id));
        }
        Ok(volunteer)
    }

    /// Validate and store a signup made on `today`.
    pub fn sign_up(
        &self,
        volunteer_id: VolunteerId,
        shift_id: ShiftId,
        today: NaiveDate,
    ) -> Result<Signup, SignupServiceError> {
        self.approved_volunteer(volunteer_id)?;
        let shift = self.shift(shift_id)?;
        if self
            .store
            .active_signup_for(volunteer_id, shift_id)?
            .is_some()
        {
            return Err(SignupServiceError::Duplicate);
        }

        let report = self.assess(volunteer_id, shift_id, today)?;
        if !report.allowed() {
            info!(
                volunteer = volunteer_id.0,
                shift = shift_id.0,
                phase = report.phase.label(),
                reason = report.first_reason().unwrap_or_default(),
                "signup rejected"
            );
            return Err(SignupServiceError::Rejected(report.violations));
        }

        let signup = self
            .store
            .insert_signup(volunteer_id, shift_id, today)
            .map_err(|err| match err {
                RepositoryError::Conflict => SignupServiceError::Duplicate,
                RepositoryError::ShiftFull => {
                    warn!(shift = shift_id.0, "shift filled during signup");
                    SignupServiceError::Rejected(vec![check_capacity(
                        shift.capacity,
                        shift.capacity,
                    )])
                }
                other => other.into(),
            })?;

        info!(
            volunteer = volunteer_id.0,
            shift = shift_id.0,
            signup = signup.id.0,
            phase = report.phase.label(),
            "signup stored"
        );
        Ok(signup)
    }

    /// Soft-delete an active signup; the seat and quota are released.
    pub fn drop_signup(
        &self,
        signup_id: SignupId,
        today: NaiveDate,
    ) -> Result<Signup, SignupServiceError> {
        let signup = self
            .store
            .drop_signup(signup_id, today)
            .map_err(|err| match err {
                RepositoryError::NotFound => SignupServiceError::SignupNotFound(signup_id),
                other => other.into(),
            })?;
        info!(signup = signup_id.0, shift = signup.shift_id.0, "signup dropped");
        Ok(signup)
    }

    pub fn volunteer_shifts(
        &self,
        volunteer_id: VolunteerId,
        month: YearMonth,
    ) -> Result<Vec<VolunteerShift>, SignupServiceError> {
        self.volunteer(volunteer_id)?;
        Ok(self.store.active_signups(volunteer_id, month)?)
    }
}

/// Error raised by the signup service.
#[derive(Debug, thiserror::Error)]
pub enum SignupServiceError {
    #[error("volunteer {0:?} not found")]
    VolunteerNotFound(VolunteerId),
    #[error("shift {0:?} not found")]
    ShiftNotFound(ShiftId),
    #[error("signup {0:?} not found")]
    SignupNotFound(SignupId),
    #[error("volunteer {0:?} is not approved to sign up")]
    NotApproved(VolunteerId),
    #[error("record already exists")]
    Duplicate,
    #[error("invalid volunteer: {0}")]
    InvalidVolunteer(String),
    #[error("invalid shift: {0}")]
    InvalidShift(String),
    #[error("signup rejected: {}", rejection_summary(.0))]
    Rejected(Vec<RuleVerdict>),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SignupServiceError {
    /// HTTP status shared by the signup router and `AppError`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SignupServiceError::VolunteerNotFound(_)
            | SignupServiceError::ShiftNotFound(_)
            | SignupServiceError::SignupNotFound(_) => StatusCode::NOT_FOUND,
            SignupServiceError::NotApproved(_) => StatusCode::FORBIDDEN,
            SignupServiceError::Duplicate => StatusCode::CONFLICT,
            SignupServiceError::InvalidVolunteer(_) | SignupServiceError::InvalidShift(_) => {
                StatusCode::BAD_REQUEST
            }
            SignupServiceError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SignupServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn rejection_summary(violations: &[RuleVerdict]) -> String {
    violations
        .iter()
        .filter_map(|verdict| verdict.reason.as_deref())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<EligibilityError> for SignupServiceError {
    fn from(value: EligibilityError) -> Self {
        match value {
            EligibilityError::ShiftNotFound(id) => Self::ShiftNotFound(id),
            EligibilityError::Repository(err) => Self::Repository(err),
        }
    }
}
