pub mod accuracy;
pub mod app;
pub mod chart;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod ui;
pub mod state;

pub use accuracy::load_accuracy;
pub use app::router;
pub use client::PredictorClient;
pub use config::AppConfig;
pub use state::AppState;
