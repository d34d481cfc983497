use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict_form))
        .route("/api/predict", post(handlers::predict))
        .route("/api/accuracy", get(handlers::get_accuracy))
        .route("/api/chart", get(handlers::get_chart))
        .with_state(state)
}
