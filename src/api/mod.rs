use crate::adapters::Clients;
use crate::config::Config;
use crate::services::diagnostics_service::DiagnosticsService;
use crate::services::submission_service::SubmissionService;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Method, Request, header};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod contact;
pub mod diagnostics;
pub mod schemas;

// Room for multipart boundaries and the text fields around the attachment.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub submission_service: SubmissionService,
    pub diagnostics_service: DiagnosticsService,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, clients: Clients) -> Self {
        Self {
            submission_service: SubmissionService::new(clients.clone(), config.submissions.clone()),
            diagnostics_service: DiagnosticsService::new(clients, config.aws.clone()),
            config,
        }
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, HeaderName::from_static("x-requested-with")])
        .max_age(Duration::from_secs(600))
}

/// Configures and returns the application router.
///
/// # Panics
/// Panics if the rate limiter configuration cannot be constructed.
pub fn app_router(config: Config, clients: Clients) -> Router {
    let interval_ns = 1_000_000_000 / config.rate_limit.per_second.max(1);
    let write_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(interval_ns))
            .burst_size(config.rate_limit.burst.max(1))
            .finish()
            .expect("Failed to build rate limiter config"),
    );

    let body_limit = config.submissions.max_attachment_bytes.saturating_add(FORM_OVERHEAD_BYTES);
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);
    let state = AppState::new(config, clients);

    // Routes that write to the stores
    let write_routes = Router::new()
        .route("/contact", post(contact::submit_contact))
        .route("/test-write", post(diagnostics::test_write))
        .layer(GovernorLayer::new(write_conf));

    let read_routes = Router::new()
        .route("/health", get(diagnostics::health))
        .route("/aws-config", get(diagnostics::aws_config))
        .route("/test-dynamodb", get(diagnostics::test_dynamodb));

    Router::new()
        .merge(write_routes)
        .merge(read_routes)
        .fallback(diagnostics::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer())
        .with_state(state)
}
