use crate::infra::{phase_summary, AppState, PhaseSummary};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use shift_signup::signups::{
    signup_router, QuotaLimits, SignupService, SignupStore, YearMonth,
};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct PhaseQuery {
    pub(crate) month: YearMonth,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn with_signup_routes<S>(service: Arc<SignupService<S>>) -> axum::Router
where
    S: SignupStore + 'static,
{
    let limits = *service.engine().limits();

    signup_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/phase",
            get(move |Query(query): Query<PhaseQuery>| async move {
                phase_endpoint(query, limits)
            }),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) fn phase_endpoint(query: PhaseQuery, limits: QuotaLimits) -> Json<PhaseSummary> {
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    Json(phase_summary(query.month, today, &limits))
}
