// 🌐 REST API - directory search + account signup/login
//
// All routes are nested under /api. Handlers receive an injected `AppState`;
// there is no process-wide state, so every test can build its own.

use crate::config::DirectoryConfig;
use crate::entities::{
    AccountProfile, AccountRegistry, Catalog, CatalogEntry, ProviderRecord, ProviderRegistry,
};
use crate::error::DirectoryError;
use crate::query::{SearchParams, SearchQuery};
use crate::seed::seed_registry;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    pub providers: ProviderRegistry,
    pub accounts: AccountRegistry,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(providers: ProviderRegistry, accounts: AccountRegistry, catalog: Catalog) -> Self {
        Self {
            providers,
            accounts,
            catalog,
        }
    }

    /// Seed the directory and create an empty account registry per config
    pub fn from_config(config: &DirectoryConfig) -> anyhow::Result<Self> {
        let providers = seed_registry(config.seed.providers_csv.as_deref())?;
        let accounts = AccountRegistry::with_policy(config.accounts.signup_policy);
        Ok(Self::new(providers, accounts, Catalog::new()))
    }
}

// ============================================================================
// Request / Response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful signup/login response
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub message: String,
    pub user: AccountProfile,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Unwrap a JSON body, reporting malformed input as a 400 `{message}`
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, DirectoryError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| {
            DirectoryError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
        })
}

// ============================================================================
// API Handlers
// ============================================================================

/// POST /api/signup - Register a new account
async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, DirectoryError> {
    let body = json_body(payload)?;

    let account = state.accounts.signup(
        body.name.as_deref().unwrap_or_default(),
        body.email.as_deref().unwrap_or_default(),
        body.password.as_deref().unwrap_or_default(),
    )?;

    Ok(Json(AccountResponse {
        message: "Signup successful".to_string(),
        user: account.profile(),
    }))
}

/// POST /api/login - Check credentials
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, DirectoryError> {
    let body = json_body(payload)?;

    let account = state.accounts.login(
        body.email.as_deref().unwrap_or_default(),
        body.password.as_deref().unwrap_or_default(),
    )?;

    Ok(Json(AccountResponse {
        message: "Login successful".to_string(),
        user: account.profile(),
    }))
}

/// GET /api/doctors - Filtered, sorted directory search
///
/// Unknown or malformed parameters are ignored, never rejected.
async fn search_doctors(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Json<Vec<ProviderRecord>> {
    let query = SearchQuery::from(SearchParams::from_pairs(raw));
    Json(state.providers.search(&query))
}

/// GET /api/doctors/:id - Single provider
async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProviderRecord>, DirectoryError> {
    state
        .providers
        .find_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| DirectoryError::NotFound(format!("Doctor {}", id)))
}

/// GET /api/locations
async fn list_locations(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    Json(state.catalog.locations().to_vec())
}

/// GET /api/specialities
async fn list_specialities(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    Json(state.catalog.specialities().to_vec())
}

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

// ============================================================================
// Router
// ============================================================================

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/doctors", get(search_doctors))
        .route("/doctors/:id", get(get_doctor))
        .route("/locations", get(list_locations))
        .route("/specialities", get(list_specialities))
        .route("/health", get(health_check))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
