//! Scanner API endpoint.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::types::ScanResult;
use crate::AppState;

/// Query parameters for the scanner endpoint.
#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    /// Scan type: intraday, swing or longterm. Defaults to swing.
    #[serde(rename = "type")]
    pub scan_type: Option<String>,
}

/// Create the scanner router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/scanner", get(run_scan))
}

/// Run (or serve the cached) scan for the requested type.
async fn run_scan(
    State(state): State<AppState>,
    Query(query): Query<ScanQuery>,
) -> Result<Json<ScanResult>> {
    let scan_type = query.scan_type.as_deref().unwrap_or("swing");
    let result = state.scanner.run_scan(scan_type).await?;
    Ok(Json(result))
}
