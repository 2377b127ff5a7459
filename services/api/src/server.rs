use crate::cli::ServeArgs;
use crate::infra::{shutdown_signal, AppState};
use crate::mongo::MongoCareerStore;
use crate::routes::with_career_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use careers::config::AppConfig;
use careers::error::AppError;
use careers::telemetry;
use careers::workflows::careers::{
    CareerService, CareerStore, InMemoryCareerStore, OrganizationStore,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.storage.uses_mongodb() {
        let store = MongoCareerStore::connect(&config.storage).await?;
        if let Err(err) = store.ping().await {
            warn!(error = %err, "mongodb did not answer ping; serving anyway");
        }
        let shared = Arc::new(store.clone());
        let service = Arc::new(CareerService::new(shared.clone(), shared));
        let result = serve(&config, service).await;
        store.shutdown().await;
        info!("mongodb client closed");
        result
    } else {
        warn!("MONGODB_URI not set; careers are kept in memory only");
        let store = Arc::new(InMemoryCareerStore::new());
        let service = Arc::new(CareerService::new(store.clone(), store));
        serve(&config, service).await
    }
}

async fn serve<O, C>(config: &AppConfig, service: Arc<CareerService<O, C>>) -> Result<(), AppError>
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_career_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        mongodb = config.storage.uses_mongodb(),
        "career quota service ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            readiness_flag.store(false, Ordering::Release);
        })
        .await?;
    Ok(())
}
