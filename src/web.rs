use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Form, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use log::{info, warn};

use crate::assets::Assets;
use crate::error::Result;
use crate::model::HeartModel;
use crate::page::{Outcome, Pages};
use crate::records::PatientRecord;

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Shared, read-only for the life of the process.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<HeartModel>,
    pub assets: Arc<Assets>,
    pub pages: Arc<Pages>,
}

impl AppState {
    pub fn new(model: HeartModel, assets: Assets) -> Result<Self> {
        Ok(AppState {
            model: Arc::new(model),
            assets: Arc::new(assets),
            pages: Arc::new(Pages::new()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/assets/{name}", get(asset))
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "heartwise listening on http://{} ({} trees, seed {})",
        listener.local_addr()?,
        state.model.n_trees(),
        state.model.seed()
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Renders a page, or a plain 500 if the template engine fails.
fn page_response(
    state: &AppState,
    status: StatusCode,
    record: &PatientRecord,
    outcome: Outcome<'_>,
) -> Response {
    match state.pages.render(record, outcome) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            warn!("page render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn index(State(state): State<AppState>) -> Response {
    page_response(
        &state,
        StatusCode::OK,
        &PatientRecord::default(),
        Outcome::Awaiting,
    )
}

async fn health() -> &'static str {
    "ok"
}

async fn predict(State(state): State<AppState>, Form(record): Form<PatientRecord>) -> Response {
    if let Err(e) = record.validate() {
        warn!("rejected submission: {}", e);
        let message = e.to_string();
        return page_response(
            &state,
            StatusCode::UNPROCESSABLE_ENTITY,
            &record,
            Outcome::Invalid(&message),
        );
    }

    match state.model.predict(&record) {
        Ok(label) => {
            info!("prediction {:?} for {:?}", label, record);
            page_response(&state, StatusCode::OK, &record, Outcome::Result(label))
        }
        Err(e) => {
            warn!("prediction failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn asset(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.assets.get(&name) {
        Some(asset) => (
            [(header::CONTENT_TYPE, asset.content_type)],
            asset.bytes.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
