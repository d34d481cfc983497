use std::{env, net::SocketAddr};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PREDICTOR_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub predictor_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env::var("PORT").ok(), env::var("PREDICTOR_URL").ok())
    }

    fn from_vars(port: Option<String>, predictor_url: Option<String>) -> Self {
        let port = port
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let predictor_url = predictor_url
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_PREDICTOR_URL.to_string());

        Self { port, predictor_url }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
