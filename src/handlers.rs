use crate::errors::AppError;
use crate::models::{AccuracyView, ChartView, PredictionForm, ResultPanel};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::Local;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut session = state.session.lock().await;
    let alert = session.take_alert();
    Html(render_index(&session, alert.as_deref()))
}

pub async fn predict_form(
    State(state): State<AppState>,
    Form(form): Form<PredictionForm>,
) -> Redirect {
    // failures are queued as the page's alert inside submit_prediction
    let _ = submit_prediction(&state, &form).await;
    Redirect::to("/")
}

pub async fn predict(
    State(state): State<AppState>,
    Json(form): Json<PredictionForm>,
) -> Result<Json<ResultPanel>, AppError> {
    Ok(Json(submit_prediction(&state, &form).await?))
}

pub async fn get_accuracy(State(state): State<AppState>) -> Json<AccuracyView> {
    let session = state.session.lock().await;
    Json(session.accuracy().into())
}

pub async fn get_chart(State(state): State<AppState>) -> Json<ChartView> {
    let session = state.session.lock().await;
    Json(session.chart().view())
}

/// Sends one prediction request and applies the answer, unless a newer
/// submission started while this one was in flight.
pub async fn submit_prediction(
    state: &AppState,
    form: &PredictionForm,
) -> Result<ResultPanel, AppError> {
    let request = form.to_request();
    let generation = state.session.lock().await.begin_submission();

    let outcome = state.client.predict(&request).await;

    let mut session = state.session.lock().await;
    match outcome {
        Ok(response) => session.apply_prediction(generation, response, Local::now()),
        Err(err) => {
            if !session.fail_submission(generation, &err) {
                return Err(AppError::superseded());
            }
            Err(err)
        }
    }
}
