use crate::cli::ServeArgs;
use crate::infra::{
    underwriting_config, AppState, FingerprintCredentialScheme, InMemoryApplicationRepository,
    InMemoryTokenAuthority, InMemoryUserRepository,
};
use crate::routes::operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loanflow::config::AppConfig;
use loanflow::error::AppError;
use loanflow::telemetry;
use loanflow::workflows::identity::{identity_router, IdentityService};
use loanflow::workflows::origination::{application_router, LoanOriginationService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

const CREDENTIAL_SALT_ENV: &str = "APP_CREDENTIAL_SALT";

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

    let users = Arc::new(InMemoryUserRepository::default());
    let applications = Arc::new(InMemoryApplicationRepository::default());
    let credentials = Arc::new(FingerprintCredentialScheme::new(
        std::env::var(CREDENTIAL_SALT_ENV).unwrap_or_else(|_| "loanflow-dev".to_string()),
    ));
    let tokens = Arc::new(InMemoryTokenAuthority::default());

    let identity = Arc::new(IdentityService::new(
        users.clone(),
        credentials,
        tokens.clone(),
    ));
    let origination = Arc::new(LoanOriginationService::new(
        applications,
        users,
        underwriting_config(&config.policy),
    ));

    let app = identity_router(identity)
        .merge(application_router(origination, tokens))
        .merge(operational_routes())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan origination service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
