use crate::models::AccuracyState;
use crate::state::AppState;
use tracing::{error, info};

/// Fetches the model's R² score and settles it into the session.
pub async fn load_accuracy(state: &AppState) -> AccuracyState {
    let settled = match state.client.accuracy().await {
        Ok(Some(score)) => {
            info!(r2_score = score, "model accuracy loaded");
            AccuracyState::Loaded(score)
        }
        Ok(None) => {
            info!("model accuracy unavailable");
            AccuracyState::Unavailable
        }
        Err(err) => {
            error!("failed to fetch accuracy: {err}");
            AccuracyState::Failed
        }
    };

    let mut session = state.session.lock().await;
    session.settle_accuracy(settled);
    session.accuracy()
}
