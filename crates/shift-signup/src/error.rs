use crate::config::ConfigError;
use crate::signups::{RosterImportError, SignupServiceError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Roster(RosterImportError),
    Signup(SignupServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Roster(err) => write!(f, "roster error: {}", err),
            AppError::Signup(err) => write!(f, "signup error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Roster(err) => Some(err),
            AppError::Signup(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Roster(RosterImportError::Service(ref err)) => err.status_code(),
            AppError::Roster(_) => StatusCode::BAD_REQUEST,
            AppError::Signup(ref err) => err.status_code(),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<RosterImportError> for AppError {
    fn from(value: RosterImportError) -> Self {
        Self::Roster(value)
    }
}

impl From<SignupServiceError> for AppError {
    fn from(value: SignupServiceError) -> Self {
        Self::Signup(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signups::{RepositoryError, VolunteerId};

    #[test]
    fn signup_errors_keep_their_router_status() {
        let cases = [
            (
                SignupServiceError::VolunteerNotFound(VolunteerId(1)),
                StatusCode::NOT_FOUND,
            ),
            (
                SignupServiceError::NotApproved(VolunteerId(1)),
                StatusCode::FORBIDDEN,
            ),
            (SignupServiceError::Duplicate, StatusCode::CONFLICT),
            (
                SignupServiceError::Rejected(Vec::new()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                SignupServiceError::Repository(RepositoryError::NotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let response = AppError::from(error).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn roster_errors_are_bad_requests_unless_the_service_says_otherwise() {
        let io_error = AppError::Roster(RosterImportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing roster",
        )));
        assert_eq!(io_error.into_response().status(), StatusCode::BAD_REQUEST);

        let duplicate = AppError::Roster(RosterImportError::Service(
            SignupServiceError::Duplicate,
        ));
        assert_eq!(duplicate.into_response().status(), StatusCode::CONFLICT);
    }
}
