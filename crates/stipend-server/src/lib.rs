//! Stipend Web Server
//!
//! Axum-based REST API for the Stipend budget planner: stateless budget,
//! insight, investment and advice endpoints plus in-memory onboarding/chat
//! sessions.
//!
//! Security features:
//! - Bearer API key authentication (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Sanitized error responses

use std::path::Path;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use stipend_core::{AdviceBackend, AdviceResponder, Config};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

mod handlers;
mod store;

pub use store::{SessionHandle, SessionStore, SESSION_TIMEOUT};

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Accepted keys, sent as "Bearer <key>" in the Authorization header
    pub api_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    pub responder: AdviceResponder,
    pub sessions: SessionStore,
    /// Chart slices at or below this amount are hidden
    pub display_threshold: f64,
}

impl AppState {
    pub fn new(config: ServerConfig, responder: AdviceResponder, display_threshold: f64) -> Self {
        Self {
            config,
            responder,
            sessions: SessionStore::new(),
            display_threshold,
        }
    }

    /// State built from the loaded app config
    pub fn from_app_config(app_config: &Config, config: ServerConfig) -> Self {
        Self::new(
            config,
            AdviceResponder::from_config(&app_config.advice),
            app_config.report.display_threshold,
        )
    }
}

/// Authentication middleware - validates bearer API keys
///
/// Keys are compared in constant time.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    let api_key_valid = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|key| validate_api_key(key.trim(), &state.config.api_keys))
        .unwrap_or(false);

    if api_key_valid {
        tracing::debug!(path = %request.uri().path(), "Authenticated via API key");
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid API key");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Validate an API key against the configured keys using constant-time comparison
fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();

    valid_keys.iter().any(|key| {
        let key_bytes = key.as_bytes();
        provided_bytes.len() == key_bytes.len() && bool::from(provided_bytes.ct_eq(key_bytes))
    })
}

/// GET /health - Liveness and advice backend summary (no auth)
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let advice = state
        .responder
        .remote()
        .map(|client| client.kind())
        .unwrap_or("templates");
    Json(serde_json::json!({
        "status": "ok",
        "advice": advice,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Create the application router from loaded config
pub fn create_router(app_config: &Config, static_dir: Option<&Path>, config: ServerConfig) -> Router {
    create_router_with_state(
        Arc::new(AppState::from_app_config(app_config, config)),
        static_dir,
    )
}

/// Create the application router around prepared state (for testing)
pub fn create_router_with_state(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let config = state.config.clone();

    let api_routes = Router::new()
        // Reference data
        .route("/reference/metros", get(handlers::list_metros))
        .route("/reference/services", get(handlers::list_services))
        .route("/reference/categories", get(handlers::list_categories))
        .route(
            "/reference/investments",
            get(handlers::list_investment_guides),
        )
        // Stateless calculations
        .route("/budget", post(handlers::compute_budget))
        .route("/insights", post(handlers::compute_insights))
        .route("/investments", post(handlers::compute_investment_plan))
        .route("/advice", post(handlers::ask_advice))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        // Onboarding wizard
        .route(
            "/sessions/:id/onboarding",
            get(handlers::get_onboarding),
        )
        .route(
            "/sessions/:id/onboarding/basics",
            post(handlers::submit_basics),
        )
        .route(
            "/sessions/:id/onboarding/services",
            post(handlers::submit_services),
        )
        .route(
            "/sessions/:id/onboarding/goals",
            post(handlers::submit_goals),
        )
        .route(
            "/sessions/:id/onboarding/confirm",
            post(handlers::confirm_onboarding),
        )
        .route("/sessions/:id/onboarding/back", post(handlers::go_back))
        // Post-onboarding edits
        .route("/sessions/:id/profile", put(handlers::update_profile))
        .route("/sessions/:id/services", put(handlers::update_services))
        .route("/sessions/:id/budget", get(handlers::get_session_budget))
        .route(
            "/sessions/:id/insights",
            get(handlers::get_session_insights),
        )
        .route(
            "/sessions/:id/investments",
            get(handlers::get_session_investment_plan),
        )
        // Chat
        .route(
            "/sessions/:id/chat",
            get(handlers::get_chat).post(handlers::post_chat),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Build CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    let mut app = Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(security_headers);

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with default (authenticated) settings
pub async fn serve(
    app_config: Config,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> anyhow::Result<()> {
    serve_with_config(app_config, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    app_config: Config,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if config.api_keys.is_empty() {
        warn!("No API keys configured - every /api request will be rejected");
    }

    let state = Arc::new(AppState::from_app_config(&app_config, config));
    check_advice_connection(&state.responder).await;

    let app = create_router_with_state(state, static_dir);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log advice backend connection status
async fn check_advice_connection(responder: &AdviceResponder) {
    match responder.remote() {
        Some(client) => {
            let healthy = tokio::time::timeout(responder.timeout(), client.health_check())
                .await
                .unwrap_or(false);
            if healthy {
                info!(
                    "✅ Advice backend reachable: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "⚠️  Advice backend not reachable at {} - answers will come from templates",
                    client.host()
                );
            }
        }
        None => {
            info!("ℹ️  Advice backend not configured (set STIPEND_ADVICE_API_KEY to enable)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error to its HTTP status, hiding internal details
    pub fn from_core(err: stipend_core::Error) -> Self {
        use stipend_core::Error;

        match err {
            Error::InvalidProfile(_) | Error::UnknownLocation(_) | Error::InvalidData(_) => {
                Self::bad_request(&err.to_string())
            }
            Error::NotFound(_) => Self::not_found(&err.to_string()),
            Error::InvalidTransition { .. } | Error::OnboardingIncomplete => {
                Self::conflict(&err.to_string())
            }
            other => Self::from(other),
        }
    }

    /// Map a JSON body rejection to a JSON error response
    ///
    /// Bodies that parse but don't fit the request type (unknown metro,
    /// missing or unknown field) are client input errors and get 400.
    pub fn from_json_rejection(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
            other => other,
        };
        Self {
            status,
            message: rejection.body_text(),
            internal: None,
        }
    }
}

/// JSON body extractor whose rejections use the `{"error": ...}` body
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::from_json_rejection(rejection)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred".to_string(),
            internal: Some(err.into()),
        }
    }
}
