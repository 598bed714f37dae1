//! FinWise Web Server
//!
//! Axum-based REST API for the FinWise personal finance assistant.
//!
//! Security posture:
//! - Bearer-token authentication over sessions issued at sign-in
//!   (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Sanitized error responses (full errors are logged, not returned)

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use finwise_core::{
    AdviceGenerator, AuthConfig, BankClient, IdentityClient, LearningContentLoader, LlmClient,
    LocalStore, ProfileStoreClient, SessionManager,
};

mod handlers;
mod workspace;

pub use workspace::{UserWorkspace, WorkspaceManager};

/// Authorization header for bearer-token auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// User identifier used when authentication is disabled
const LOCAL_DEV_USER: &str = "local-dev";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Auth/profile gateway (session context)
    pub auth: SessionManager,
    /// Text-generation backend, if configured
    pub llm: Option<LlmClient>,
    /// Banking data source for advisor context
    pub bank: BankClient,
    pub config: ServerConfig,
    /// Per-user in-memory dashboards and chat logs
    pub workspaces: WorkspaceManager,
    /// Issued session tokens: token -> uid
    tokens: RwLock<HashMap<String, String>>,
}

impl AppState {
    pub fn new(
        auth: SessionManager,
        llm: Option<LlmClient>,
        bank: BankClient,
        config: ServerConfig,
    ) -> Self {
        Self {
            auth,
            llm,
            bank,
            config,
            workspaces: WorkspaceManager::new(),
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Build state from environment variables.
    ///
    /// Falls back to mock identity/profile backends when Firebase is not
    /// configured, so a local dev server works out of the box.
    pub fn from_env(config: ServerConfig) -> Self {
        let identity = match IdentityClient::from_env() {
            Some(client) => client,
            None => {
                info!("ℹ️  Identity provider not configured (set FIREBASE_API_KEY); using mock");
                IdentityClient::mock()
            }
        };
        let store = match ProfileStoreClient::from_env() {
            Some(client) => client,
            None => {
                info!("ℹ️  Profile store not configured (set FIREBASE_PROJECT_ID); using mock");
                ProfileStoreClient::mock()
            }
        };
        let auth = SessionManager::new(
            identity,
            store,
            LocalStore::open_default(),
            AuthConfig::from_env(),
        );

        let llm = LlmClient::from_env();
        match llm {
            Some(ref client) => {
                use finwise_core::LlmBackend;
                info!(
                    "LLM backend configured: {} (model: {})",
                    client.host(),
                    client.model()
                );
            }
            None => {
                info!("ℹ️  LLM backend not configured (set GEMINI_API_KEY to enable AI features)")
            }
        }

        Self::new(auth, llm, BankClient::from_env(), config)
    }

    /// Advice generator over the configured backends, if the LLM is set up
    pub fn advisor(&self) -> Option<AdviceGenerator> {
        self.llm
            .clone()
            .map(|llm| AdviceGenerator::new(self.bank.clone(), llm))
    }

    /// Learning content loader, if the LLM is set up
    pub fn loader(&self) -> Option<LearningContentLoader> {
        self.llm.clone().map(LearningContentLoader::new)
    }

    /// Issue a session token for a user
    pub async fn issue_token(&self, token: &str, uid: &str) {
        self.tokens
            .write()
            .await
            .insert(token.to_string(), uid.to_string());
    }

    /// Revoke a session token
    pub async fn revoke_token(&self, token: &str) {
        self.tokens.write().await.remove(token);
    }

    async fn resolve_token(&self, token: &str) -> Option<String> {
        self.tokens.read().await.get(token).cloned()
    }
}

/// The authenticated user attached to each request
#[derive(Clone)]
pub struct AuthedUser {
    pub uid: String,
    /// The presented bearer token (empty in --no-auth mode)
    pub token: String,
}

/// Authentication middleware - validates bearer tokens issued at sign-in
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        request.extensions_mut().insert(AuthedUser {
            uid: LOCAL_DEV_USER.to_string(),
            token: String::new(),
        });
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    if let Some(token) = token {
        if let Some(uid) = state.resolve_token(&token).await {
            request.extensions_mut().insert(AuthedUser { uid, token });
            return next.run(request).await;
        }
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid session token");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Routes reachable without a session
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/currencies", get(handlers::list_currencies))
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/login", post(handlers::login));

    // Everything else requires a session token
    let protected_routes = Router::new()
        // Auth
        .route("/auth/logout", post(handlers::logout))
        .route("/me", get(handlers::get_me))
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/expenses/reset", post(handlers::reset_expenses))
        .route("/expenses/summary", get(handlers::expense_summary))
        // Savings goals
        .route("/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route("/goals/:id/contribute", post(handlers::contribute_to_goal))
        .route("/goals/reset", post(handlers::reset_goals))
        // Investments
        .route(
            "/investments",
            get(handlers::list_investments).post(handlers::create_investment),
        )
        .route("/investments/reset", post(handlers::reset_investments))
        .route("/investments/summary", get(handlers::investment_summary))
        // Emergency fund
        .route("/emergency-fund", get(handlers::get_emergency_fund))
        .route(
            "/emergency-fund/contribute",
            post(handlers::contribute_to_emergency_fund),
        )
        .route("/emergency-fund/target", put(handlers::set_emergency_fund_target))
        .route("/emergency-fund/reset", post(handlers::reset_emergency_fund))
        // Chat
        .route("/chat", get(handlers::get_chat).post(handlers::post_chat))
        // Learning content
        .route("/learn", get(handlers::get_learning_content))
        // Settings
        .route("/settings/currency", put(handlers::update_currency))
        .route(
            "/settings/dark-mode",
            get(handlers::get_dark_mode).put(handlers::set_dark_mode),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes);

    // Build CORS layer
    let cors = if state.config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind and serve the application
pub async fn serve(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("FinWise server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
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

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
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

    pub fn unprocessable(msg: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.to_string(),
            internal: None,
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
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
