use crate::chart::ChartSeriesUpdater;
use crate::client::PredictorClient;
use crate::errors::AppError;
use crate::models::{AccuracyState, PredictionResponse, ResultPanel};
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub client: PredictorClient,
    pub session: Arc<Mutex<PageSession>>,
}

impl AppState {
    pub fn new(client: PredictorClient) -> Self {
        Self {
            client,
            session: Arc::new(Mutex::new(PageSession::default())),
        }
    }
}

/// Everything the page shows. Lives from start-up until shutdown.
#[derive(Debug)]
pub struct PageSession {
    chart: ChartSeriesUpdater,
    accuracy: AccuracyState,
    result: Option<ResultPanel>,
    pending_alert: Option<String>,
    generation: u64,
}

impl Default for PageSession {
    fn default() -> Self {
        Self {
            chart: ChartSeriesUpdater::default(),
            accuracy: AccuracyState::Pending,
            result: None,
            pending_alert: None,
            generation: 0,
        }
    }
}

impl PageSession {
    /// Hands out the id a submission must present when its response lands.
    pub fn begin_submission(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn apply_prediction(
        &mut self,
        generation: u64,
        response: PredictionResponse,
        now: DateTime<Local>,
    ) -> Result<ResultPanel, AppError> {
        if !self.is_current(generation) {
            info!(generation, latest = self.generation, "discarding superseded prediction");
            return Err(AppError::superseded());
        }

        let percentage = response.predicted_demand_percentage;
        if !(0.0..=100.0).contains(&percentage) {
            warn!(percentage, "demand percentage outside 0-100");
        }

        let label = self.chart.next_label();
        self.chart.append(label.clone(), percentage, now);
        self.chart.render();

        let panel = ResultPanel {
            label,
            predicted_units: response.predicted_units,
            predicted_demand_percentage: percentage,
            is_demand_high: response.is_demand_high,
            r2_score: self.accuracy.score(),
            predicted_at: now,
        };
        self.result = Some(panel.clone());
        Ok(panel)
    }

    /// Queues a failure for the next page render. Stale failures are dropped.
    pub fn fail_submission(&mut self, generation: u64, err: &AppError) -> bool {
        if !self.is_current(generation) {
            info!(generation, latest = self.generation, "discarding superseded failure");
            return false;
        }
        self.pending_alert = Some(err.message.clone());
        true
    }

    /// Settles the accuracy once; later calls are ignored.
    pub fn settle_accuracy(&mut self, state: AccuracyState) -> bool {
        if self.accuracy != AccuracyState::Pending || state == AccuracyState::Pending {
            return false;
        }
        self.accuracy = state;
        true
    }

    pub fn accuracy(&self) -> AccuracyState {
        self.accuracy
    }

    pub fn result(&self) -> Option<&ResultPanel> {
        self.result.as_ref()
    }

    pub fn chart(&self) -> &ChartSeriesUpdater {
        &self.chart
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.pending_alert.take()
    }
}
