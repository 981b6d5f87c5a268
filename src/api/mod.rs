pub mod health;
pub mod scanner;

use axum::Router;
use std::sync::Arc;

use crate::services::Scanner;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
}

impl AppState {
    pub fn new(scanner: Arc<Scanner>) -> Self {
        Self { scanner }
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(scanner::router())
}
