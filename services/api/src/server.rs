use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAnalysisRepository, InMemoryRankingRepository};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use soulmatch::compatibility::CompatibilityEngine;
use soulmatch::config::AppConfig;
use soulmatch::error::AppError;
use soulmatch::telemetry;
use soulmatch::workflows::analysis::AnalysisService;
use soulmatch::workflows::ranking::RankingService;
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

    let analyses = Arc::new(InMemoryAnalysisRepository::default());
    let rankings = Arc::new(InMemoryRankingRepository::default());
    let engine = Arc::new(CompatibilityEngine::default());
    let analysis_service = Arc::new(AnalysisService::with_engine(analyses.clone(), engine));
    let ranking_service = Arc::new(RankingService::new(analyses, rankings, config.ranking));

    let app = with_workflow_routes(analysis_service, ranking_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        daily_limit = config.ranking.daily_limit,
        weekly_limit = config.ranking.weekly_limit,
        "soulmatch compatibility service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
