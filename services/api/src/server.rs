use crate::cli::ServeArgs;
use crate::infra::{seed_demo_fixtures, AppState, WorkflowServices};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use roadworthy::config::AppConfig;
use roadworthy::error::AppError;
use roadworthy::store::MemoryStore;
use roadworthy::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryStore::default());
    if args.demo_fixtures {
        let fixtures = seed_demo_fixtures(&store, Local::now().naive_local())?;
        info!(
            owner = %fixtures.owner.0,
            vehicle = %fixtures.vehicle.plate,
            appointment = %fixtures.appointment.id.0,
            "demo fixtures seeded"
        );
    }
    let services = WorkflowServices::new(store);

    let app = with_workflow_routes(&services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "inspection scheduling service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
