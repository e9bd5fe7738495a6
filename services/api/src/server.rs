use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_signup_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use shift_signup::config::AppConfig;
use shift_signup::error::AppError;
use shift_signup::signups::{InMemorySignupStore, RosterImporter, SignupService};
use shift_signup::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemorySignupStore::new());
    let signup_service = Arc::new(SignupService::new(store, config.signups.clone()));

    if let Some(roster) = args.roster.take() {
        let summary = RosterImporter::from_path(&roster, &*signup_service)?;
        info!(
            path = %roster.display(),
            created = summary.created,
            skipped = summary.skipped,
            "volunteer roster loaded"
        );
    }

    let app = with_signup_routes(signup_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "shift signup service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
