//! Volunteer shift signups governed by phase-based monthly quotas.
//!
//! `eligibility` holds the pure phase clock and rule catalog plus the engine
//! that combines them with live counts. The store, service and router wrap it
//! for registration, shift management and the HTTP surface.

pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    MonthParseError, NewShift, NewVolunteer, Shift, ShiftAvailability, ShiftDetails, ShiftGap,
    ShiftId, ShiftType, Signup, SignupId, Volunteer, VolunteerId, VolunteerShift,
    VolunteerStatus, YearMonth,
};
pub use eligibility::{
    applicable_rules, determine_phase, CandidateSignup, EligibilityEngine, EligibilityError,
    EligibilityReport, QuotaLimits, RuleKind, RuleVerdict, SignupPhase,
};
pub use repository::{CountProvider, RepositoryError, SignupStore, VolunteerMonthCounts};
pub use roster::{RosterImportError, RosterImportSummary, RosterImporter};
pub use router::{signup_router, ViolationView};
pub use service::{SignupService, SignupServiceError};
pub use store::InMemorySignupStore;
