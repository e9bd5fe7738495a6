use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    NewShift, NewVolunteer, ShiftId, SignupId, VolunteerId, VolunteerStatus, YearMonth,
};
use super::eligibility::{RuleKind, RuleVerdict, SignupPhase};
use super::repository::SignupStore;
use super::service::{SignupService, SignupServiceError};

/// Router builder exposing volunteer, shift and signup endpoints.
pub fn signup_router<S>(service: Arc<SignupService<S>>) -> Router
where
    S: SignupStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/volunteers",
            post(register_handler::<S>).get(list_volunteers_handler::<S>),
        )
        .route(
            "/api/v1/volunteers/:volunteer_id",
            delete(remove_volunteer_handler::<S>),
        )
        .route(
            "/api/v1/volunteers/:volunteer_id/approve",
            post(approve_handler::<S>),
        )
        .route(
            "/api/v1/volunteers/:volunteer_id/reject",
            post(reject_handler::<S>),
        )
        .route(
            "/api/v1/volunteers/:volunteer_id/shifts",
            get(volunteer_shifts_handler::<S>),
        )
        .route(
            "/api/v1/shifts",
            post(create_shift_handler::<S>).get(list_shifts_handler::<S>),
        )
        .route("/api/v1/shifts/seed", post(seed_handler::<S>))
        .route("/api/v1/coordinator/gaps", get(gaps_handler::<S>))
        .route("/api/v1/eligibility", get(eligibility_handler::<S>))
        .route("/api/v1/signups", post(signup_handler::<S>))
        .route("/api/v1/signups/:signup_id", delete(drop_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct MonthQuery {
    pub(crate) month: YearMonth,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VolunteerListQuery {
    #[serde(default)]
    pub(crate) status: Option<VolunteerStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TodayQuery {
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EligibilityQuery {
    pub(crate) volunteer_id: VolunteerId,
    pub(crate) shift_id: ShiftId,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SignupRequest {
    pub(crate) volunteer_id: VolunteerId,
    pub(crate) shift_id: ShiftId,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

/// Sanitized representation of one violated rule.
#[derive(Debug, Clone, Serialize)]
pub struct ViolationView {
    pub rule: RuleKind,
    pub reason: String,
    pub detail: String,
}

impl From<&RuleVerdict> for ViolationView {
    fn from(verdict: &RuleVerdict) -> Self {
        Self {
            rule: verdict.rule,
            reason: verdict.reason.clone().unwrap_or_default(),
            detail: verdict.detail().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EligibilityResponse {
    pub(crate) volunteer_id: VolunteerId,
    pub(crate) shift_id: ShiftId,
    pub(crate) today: NaiveDate,
    pub(crate) phase: SignupPhase,
    pub(crate) allowed: bool,
    pub(crate) violations: Vec<ViolationView>,
}

fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn error_response(error: SignupServiceError) -> Response {
    let status = error.status_code();

    let payload = match &error {
        SignupServiceError::Rejected(violations) => json!({
            "error": error.to_string(),
            "violations": violations.iter().map(ViolationView::from).collect::<Vec<_>>(),
        }),
        _ => json!({ "error": error.to_string() }),
    };

    (status, Json(payload)).into_response()
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, SignupServiceError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Json(volunteer): Json<NewVolunteer>,
) -> Response
where
    S: SignupStore + 'static,
{
    respond(StatusCode::CREATED, service.register_volunteer(volunteer))
}

pub(crate) async fn approve_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Path(volunteer_id): Path<u64>,
) -> Response
where
    S: SignupStore + 'static,
{
    respond(
        StatusCode::OK,
        service.approve_volunteer(VolunteerId(volunteer_id)),
    )
}

pub(crate) async fn list_volunteers_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Query(query): Query<VolunteerListQuery>,
) -> Response
where
    S: SignupStore + 'static,
{
    respond(StatusCode::OK, service.list_volunteers(query.status))
}

pub(crate) async fn reject_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Path(volunteer_id): Path<u64>,
) -> Response
where
    S: SignupStore + 'static,
{
    respond(
        StatusCode::OK,
        service.reject_volunteer(VolunteerId(volunteer_id)),
    )
}

pub(crate) async fn remove_volunteer_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Path(volunteer_id): Path<u64>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    S: SignupStore + 'static,
{
    let today = resolve_today(query.today);
    match service.remove_volunteer(VolunteerId(volunteer_id), today) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn volunteer_shifts_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Path(volunteer_id): Path<u64>,
    Query(query): Query<MonthQuery>,
) -> Response
where
    S: SignupStore + 'static,
{
    respond(
        StatusCode::OK,
        service.volunteer_shifts(VolunteerId(volunteer_id), query.month),
    )
}

pub(crate) async fn create_shift_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Json(shift): Json<NewShift>,
) -> Response
where
    S: SignupStore + 'static,
{
    respond(StatusCode::CREATED, service.create_shift(shift))
}

pub(crate) async fn list_shifts_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Query(query): Query<MonthQuery>,
) -> Response
where
    S: SignupStore + 'static,
{
    respond(StatusCode::OK, service.month_availability(query.month))
}

pub(crate) async fn seed_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Json(request): Json<MonthQuery>,
) -> Response
where
    S: SignupStore + 'static,
{
    let result = service
        .seed_month(request.month)
        .map(|created| json!({ "month": request.month, "created": created }));
    respond(StatusCode::OK, result)
}

pub(crate) async fn gaps_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Query(query): Query<MonthQuery>,
) -> Response
where
    S: SignupStore + 'static,
{
    respond(StatusCode::OK, service.coverage_gaps(query.month))
}

pub(crate) async fn eligibility_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Query(query): Query<EligibilityQuery>,
) -> Response
where
    S: SignupStore + 'static,
{
    let today = resolve_today(query.today);
    let result = service
        .check_signup(query.volunteer_id, query.shift_id, today)
        .map(|report| EligibilityResponse {
            volunteer_id: query.volunteer_id,
            shift_id: query.shift_id,
            today,
            phase: report.phase,
            allowed: report.allowed(),
            violations: report.violations.iter().map(ViolationView::from).collect(),
        });
    respond(StatusCode::OK, result)
}

pub(crate) async fn signup_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Json(request): Json<SignupRequest>,
) -> Response
where
    S: SignupStore + 'static,
{
    let today = resolve_today(request.today);
    respond(
        StatusCode::CREATED,
        service.sign_up(request.volunteer_id, request.shift_id, today),
    )
}

pub(crate) async fn drop_handler<S>(
    State(service): State<Arc<SignupService<S>>>,
    Path(signup_id): Path<u64>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    S: SignupStore + 'static,
{
    let today = resolve_today(query.today);
    match service.drop_signup(SignupId(signup_id), today) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}
