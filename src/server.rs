//! HTTP routes: the lookup page, the JSON debug endpoint and a health check.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json,
    routing::get,
};
use maud::Markup;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::lookup::LookupService;
use crate::transport::PlaceSearch;
use crate::types::{AddressResult, LookupStatus};
use crate::ui::{self, MapSettings, Notice};

const EMPTY_FORM_MESSAGE: &str = "Please enter a ZIP code";
const INVALID_FORM_MESSAGE: &str =
    "Invalid ZIP code format. Please enter a valid US ZIP code (e.g., 92021 or 92021-1234)";

/// Application state shared across all requests
pub struct AppState<P> {
    service: Arc<LookupService<P>>,
    map: Arc<MapSettings>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            map: Arc::clone(&self.map),
        }
    }
}

/// Build the Axum application with routes and middleware
pub fn build_app<P>(service: Arc<LookupService<P>>, map: MapSettings) -> Router
where
    P: PlaceSearch + 'static,
{
    let state = AppState {
        service,
        map: Arc::new(map),
    };

    Router::new()
        .route("/", get(index))
        .route("/lookup", get(lookup_form::<P>))
        .route("/api/test/lookup/:zip_code", get(lookup_json::<P>))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn index() -> Markup {
    ui::lookup_page("", None, None, &MapSettings::default())
}

#[derive(Deserialize)]
struct LookupQuery {
    #[serde(default)]
    zip: Option<String>,
}

/// Form submission: validate, look up, render the page with the outcome
async fn lookup_form<P: PlaceSearch + 'static>(
    State(state): State<AppState<P>>,
    Query(query): Query<LookupQuery>,
) -> Markup {
    let zip_code = query.zip.unwrap_or_default().trim().to_string();

    if zip_code.is_empty() {
        return page_with_error(&zip_code, EMPTY_FORM_MESSAGE, &state.map);
    }
    if !state.service.is_valid_zip_code(&zip_code) {
        return page_with_error(&zip_code, INVALID_FORM_MESSAGE, &state.map);
    }

    let result = state.service.lookup(&zip_code).await;
    match result.status() {
        LookupStatus::Success => ui::lookup_page(&zip_code, None, Some(&result), &state.map),
        LookupStatus::NotFound | LookupStatus::Error => {
            let message = result
                .error_message()
                .unwrap_or("Error retrieving address information");
            ui::lookup_page(
                &zip_code,
                Some(Notice {
                    text: message,
                    is_error: result.status() == LookupStatus::Error,
                }),
                Some(&result),
                &state.map,
            )
        }
    }
}

fn page_with_error(zip_code: &str, message: &str, map: &MapSettings) -> Markup {
    ui::lookup_page(
        zip_code,
        Some(Notice {
            text: message,
            is_error: true,
        }),
        None,
        map,
    )
}

/// Debug endpoint returning the raw lookup result
async fn lookup_json<P: PlaceSearch + 'static>(
    State(state): State<AppState<P>>,
    Path(zip_code): Path<String>,
) -> Json<AddressResult> {
    tracing::info!("test endpoint called for ZIP code: {}", zip_code);
    Json(state.service.lookup(&zip_code).await)
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
