mod normalizer;
mod parser;

pub use normalizer::normalize_phone;

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::domain::{NewVolunteer, VolunteerStatus};
use super::repository::SignupStore;
use super::service::{SignupService, SignupServiceError};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Service(SignupServiceError),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read volunteer roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Service(err) => {
                write!(f, "could not register roster volunteer: {}", err)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Service(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<SignupServiceError> for RosterImportError {
    fn from(err: SignupServiceError) -> Self {
        Self::Service(err)
    }
}

/// Counts reported after a roster import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RosterImportSummary {
    pub created: usize,
    pub skipped: usize,
}

/// Registers volunteers from a `phone,name,is_coordinator` CSV export.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P, S>(
        path: P,
        service: &SignupService<S>,
    ) -> Result<RosterImportSummary, RosterImportError>
    where
        P: AsRef<Path>,
        S: SignupStore + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, service)
    }

    /// Phones already on the roster are skipped, so re-importing is harmless.
    pub fn from_reader<R, S>(
        reader: R,
        service: &SignupService<S>,
    ) -> Result<RosterImportSummary, RosterImportError>
    where
        R: Read,
        S: SignupStore + 'static,
    {
        let entries = parser::parse_roster(reader)?;
        let mut summary = RosterImportSummary::default();

        for entry in entries {
            if service.volunteer_by_phone(&entry.phone)?.is_some() {
                summary.skipped += 1;
                continue;
            }

            service.register_volunteer(NewVolunteer {
                phone: entry.phone,
                name: entry.name,
                is_coordinator: entry.is_coordinator,
                status: VolunteerStatus::Approved,
            })?;
            summary.created += 1;
        }

        info!(
            created = summary.created,
            skipped = summary.skipped,
            "imported volunteer roster"
        );
        Ok(summary)
    }
}
