//! HTTP handler functions for the incident panel API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use incident_panel_analytics::build_report;
use incident_panel_dataset::{CacheState, LoadedDataset};
use incident_panel_filter::{FilterOutcome, evaluate};
use incident_panel_filter_models::FilterCriteria;
use incident_panel_server_models::{
    ApiHealth, ApiIncident, IncidentsRequest, IncidentsResponse, OptionsResponse, SummaryResponse,
};

use crate::AppState;

/// `GET /api/health`
///
/// Never waits on a dataset load; a load in progress reports
/// `datasetLoaded: false`.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset_loaded: state.cache.try_state() == Some(CacheState::Loaded),
    })
}

/// `GET /api/load-report`
///
/// Returns row counts and camera catalog status for the cached dataset.
pub async fn load_report(state: web::Data<AppState>) -> HttpResponse {
    match dataset(&state).await {
        Ok(loaded) => HttpResponse::Ok().json(&loaded.report),
        Err(response) => response,
    }
}

/// `POST /api/options`
///
/// Returns the cascading option set of every stage for the given criteria.
pub async fn options(
    state: web::Data<AppState>,
    criteria: web::Json<FilterCriteria>,
) -> HttpResponse {
    with_outcome(&state, &criteria, |outcome| {
        HttpResponse::Ok().json(OptionsResponse::from(&outcome.options))
    })
    .await
}

/// `POST /api/summary`
///
/// Returns headline metrics, the per-camera table and the breakdowns for
/// the given criteria. An empty selection yields empty breakdowns with
/// `isEmpty: true`.
pub async fn summary(
    state: web::Data<AppState>,
    criteria: web::Json<FilterCriteria>,
) -> HttpResponse {
    let loaded = match dataset(&state).await {
        Ok(loaded) => loaded,
        Err(response) => return response,
    };
    with_loaded_outcome(&loaded, &criteria, |outcome| {
        HttpResponse::Ok().json(SummaryResponse {
            applied_range: outcome.options.applied_range,
            enriched: loaded.dataset.is_enriched(),
            report: build_report(&outcome.records),
        })
    })
}

/// `POST /api/incidents`
///
/// Returns one page of the filtered rows.
pub async fn incidents(
    state: web::Data<AppState>,
    request: web::Json<IncidentsRequest>,
) -> HttpResponse {
    let limit = request.page_limit();
    let offset = request.offset.unwrap_or(0);

    with_outcome(&state, &request.criteria, |outcome| {
        let page: Vec<ApiIncident> = outcome
            .records
            .iter()
            .skip(offset)
            .take(limit)
            .map(|row| ApiIncident::from(*row))
            .collect();

        HttpResponse::Ok().json(IncidentsResponse {
            total: outcome.len(),
            limit,
            offset,
            is_empty: outcome.is_empty(),
            incidents: page,
        })
    })
    .await
}

/// `POST /api/reload`
///
/// Invalidates the dataset cache and loads the source files again.
pub async fn reload(state: web::Data<AppState>) -> HttpResponse {
    let cache = Arc::clone(&state.cache);
    match web::block(move || cache.reload()).await {
        Ok(Ok(loaded)) => {
            log::info!("Dataset reloaded: {} incidents", loaded.dataset.len());
            HttpResponse::Ok().json(&loaded.report)
        }
        Ok(Err(e)) => {
            log::error!("Failed to reload dataset: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to reload dataset: {e}")
            }))
        }
        Err(e) => {
            log::error!("Reload task failed: {e}");
            dataset_unavailable()
        }
    }
}

/// Fetches the cached dataset, loading it on a blocking thread if needed.
async fn dataset(state: &AppState) -> Result<Arc<LoadedDataset>, HttpResponse> {
    let cache = Arc::clone(&state.cache);
    match web::block(move || cache.get_or_load()).await {
        Ok(Ok(loaded)) => Ok(loaded),
        Ok(Err(e)) => {
            log::error!("Failed to load dataset: {e}");
            Err(dataset_unavailable())
        }
        Err(e) => {
            log::error!("Dataset load task failed: {e}");
            Err(dataset_unavailable())
        }
    }
}

async fn with_outcome(
    state: &AppState,
    criteria: &FilterCriteria,
    respond: impl FnOnce(&FilterOutcome<'_>) -> HttpResponse,
) -> HttpResponse {
    match dataset(state).await {
        Ok(loaded) => with_loaded_outcome(&loaded, criteria, respond),
        Err(response) => response,
    }
}

fn with_loaded_outcome(
    loaded: &LoadedDataset,
    criteria: &FilterCriteria,
    respond: impl FnOnce(&FilterOutcome<'_>) -> HttpResponse,
) -> HttpResponse {
    match evaluate(&loaded.dataset, criteria) {
        Ok(outcome) => respond(&outcome),
        Err(e) => {
            log::warn!("Rejected filter criteria: {e}");
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

fn dataset_unavailable() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Incident dataset unavailable"
    }))
}
