use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::application::PollStatus;
use crate::ports::MetricsSink;

use super::handlers::{health_handler, index_handler, metrics_handler, AppState};

/// Upper bound on a single request, slow clients included
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn create_router(sink: Arc<dyn MetricsSink>, status: Arc<PollStatus>) -> Router {
    let state = AppState { sink, status };

    let router = Router::new()
        .route("/", get(index_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler));

    with_middleware(router).with_state(state)
}

fn with_middleware(router: Router<AppState>) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
    )
}
