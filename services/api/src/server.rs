use crate::cli::ServeArgs;
use crate::infra::{catalog_path, load_catalog, AppState, InMemorySessionStore};
use crate::routes::with_matching_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use career_match::config::AppConfig;
use career_match::error::AppError;
use career_match::session::MatchingService;
use career_match::telemetry;
use chrono::Utc;
use std::sync::atomic::Ordering;
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
    if let Some(catalog) = args.catalog.take() {
        config.matching.catalog_csv = Some(catalog);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(catalog_path(None, &config.matching), Utc::now())?;
    let store = Arc::new(InMemorySessionStore::with_capacity(
        config.matching.session_capacity,
    ));
    let matching_service = Arc::new(MatchingService::new(
        store,
        Arc::new(catalog),
        config.matching.clone(),
    ));
    info!(
        postings = matching_service.catalog().len(),
        vocabulary = matching_service.registry().len(),
        "matching service initialised"
    );

    let app = with_matching_routes(matching_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "career match service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
