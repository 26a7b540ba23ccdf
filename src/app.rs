use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::parser;
use crate::search::{self, SearchMode};
use crate::store::Store;

/// Pasted uploads can be large; spreadsheets of a few thousand sites with
/// long address columns still fit comfortably under this.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub struct AppState {
    store: Mutex<Store>,
    config: Config,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> AppState {
        AppState {
            store: Mutex::new(store),
            config,
        }
    }
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    mode: String,
}

#[derive(Deserialize)]
struct VerifyRequest {
    password: Option<String>,
}

#[derive(Serialize)]
struct VerifyResponse {
    ok: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SitesUpload {
    raw_text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatrixUpload {
    brand: Option<String>,
    raw_text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    site_count: usize,
    matrix_count: usize,
    fortivoice_url_template: String,
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(&config.data_dir)?;
    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::new(store, config));

    let app = router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Site lookup running on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router. Split out from [`run`] so tests can drive it directly.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/data", get(get_data).post(upload_sites))
        .route("/api/stats", get(get_stats))
        .route("/api/matrices", get(get_matrices))
        .route("/api/matrix", post(upload_matrix))
        .route("/api/search", get(search_sites))
        .route("/api/admin/verify", post(verify_admin))
        .fallback_service(ServeDir::new("public"))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn get_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.lock().unwrap();
    Json(json!({
        "sites": store.sites(),
        "matrices": store.matrices(),
    }))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.lock().unwrap();
    Json(StatsResponse {
        site_count: store.site_count(),
        matrix_count: store.matrix_count(),
        fortivoice_url_template: state.config.fortivoice_url_template.clone(),
    })
}

async fn get_matrices(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.lock().unwrap();
    Json(json!({ "matrices": store.matrices() }))
}

/// No per-user accounts: a single shared passphrase gates the admin menu.
/// With an empty configured passphrase, an empty password unlocks it.
async fn verify_admin(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyRequest>,
) -> impl IntoResponse {
    let supplied = payload.password.unwrap_or_default();
    Json(VerifyResponse {
        ok: supplied == state.config.admin_password,
    })
}

/// The endpoint's contract is array-shaped, so failures come back as an
/// empty array with a 500 status rather than an error object.
async fn search_sites(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let mode = SearchMode::from_query(&params.mode);
    match state.store.lock() {
        Ok(store) => Json(search::search(store.sites(), &params.q, mode)).into_response(),
        Err(err) => {
            error!("Search error: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::<Value>::new())).into_response()
        }
    }
}

async fn upload_sites(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SitesUpload>,
) -> Response {
    let Some(raw_text) = payload.raw_text.filter(|t| !t.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No data received" })),
        )
            .into_response();
    };

    info!("Sites upload: {} characters", raw_text.len());
    let parsed = parser::parse(&raw_text);

    let mut store = state.store.lock().unwrap();
    match store.replace_sites(parsed) {
        Ok(count) => {
            info!("Saved {count} sites");
            Json(json!({ "success": true, "count": count })).into_response()
        }
        Err(err) => {
            error!("Sites upload error: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

async fn upload_matrix(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MatrixUpload>,
) -> Response {
    let (Some(brand), Some(raw_text)) = (
        payload.brand.filter(|b| !b.is_empty()),
        payload.raw_text.filter(|t| !t.is_empty()),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Brand name and matrix data required" })),
        )
            .into_response();
    };

    info!("Matrix upload for brand: {brand} ({} chars)", raw_text.len());
    let parsed = parser::parse(&raw_text);

    let mut store = state.store.lock().unwrap();
    match store.set_matrix(&brand, parsed) {
        Ok(rows) => {
            info!("Saved matrix for {brand} ({rows} rows)");
            Json(json!({ "success": true, "brand": brand, "rows": rows })).into_response()
        }
        Err(err) => {
            error!("Matrix upload error: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}
