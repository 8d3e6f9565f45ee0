use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::v1;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1::create_v1_router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::from_fn(metrics_middleware))
                .layer(middleware::from_fn(logging_middleware)),
        )
}

/// Full router plus the Prometheus endpoint when metrics are enabled
pub fn create_app_router(
    state: AppState,
    metrics: Option<(PrometheusMetrics, String)>,
) -> Router {
    let router = create_router_with_state(state);

    match metrics {
        Some((metrics, path)) => router.merge(create_metrics_router(metrics, &path)),
        None => router,
    }
}
