//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, limits, CORS, security headers)
//! - Serve the feedback form from the static directory
//! - Bind server to listener and shut down gracefully
//! - Prune expired rate limit windows in the background

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method},
    middleware,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers::{create_feedback, get_feedback, health, list_feedback};
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::{handle_panic, not_found};
use crate::lifecycle::shutdown::until_shutdown;
use crate::observability::{metrics, tracing::request_span};
use crate::security::headers::apply_security_headers;
use crate::security::rate_limit::RateLimiter;
use crate::storage::FeedbackStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: FeedbackStore,
    /// `None` when rate limiting is disabled.
    pub limiter: Option<Arc<RateLimiter>>,
}

/// HTTP server for the feedback service.
pub struct HttpServer {
    router: Router,
    limiter: Option<Arc<RateLimiter>>,
}

impl HttpServer {
    /// Create a new HTTP server over an opened store.
    pub fn new(config: ServiceConfig, store: FeedbackStore) -> Self {
        let limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::from_config(&config.rate_limit)));

        let state = AppState {
            store,
            limiter: limiter.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router, limiter }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/feedback", get(list_feedback).post(create_feedback))
            .route("/feedback/{id}", get(get_feedback))
            .route("/health", get(health))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .with_state(state);

        router = match &config.static_dir {
            Some(dir) => router.fallback_service(ServeDir::new(dir)),
            None => router.fallback(not_found),
        };

        Self::with_middleware(config, router)
    }

    /// Wrap routes in the limit, timeout, CORS, panic, header, trace and request ID layers.
    #[allow(deprecated)]
    fn with_middleware(config: &ServiceConfig, mut router: Router) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);

        router = router
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(cors)
            .layer(CatchPanicLayer::custom(handle_panic));

        if config.security.enable_headers {
            router = apply_security_headers(router);
        }

        router
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// Run the server until `shutdown` fires or the process is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rate_limit = self.limiter.is_some(),
            "HTTP server starting"
        );

        let pruner = self.limiter.clone().map(|limiter| {
            let every = limiter.window().min(Duration::from_secs(60));
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(every);
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let removed = limiter.prune();
                    if removed > 0 {
                        tracing::debug!(removed, "Pruned expired rate limit windows");
                    }
                }
            })
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        // Serve with graceful shutdown
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(until_shutdown(shutdown))
            .await;

        if let Some(task) = pruner {
            task.abort();
        }

        tracing::info!("HTTP server stopped");
        result
    }
}
