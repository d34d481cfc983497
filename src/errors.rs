use axum::http::StatusCode;

pub const PREDICTION_FAILED: &str = "Prediction failed.";
pub const CANNOT_CONNECT: &str = "Cannot connect to the backend.";
pub const UNEXPECTED_RESPONSE: &str = "Prediction service returned an unexpected response.";
pub const SUPERSEDED: &str = "Superseded by a newer submission.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The prediction service answered, but not with a usable body.
    Service,
    /// The request never completed.
    Transport,
    Superseded,
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn service(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Service,
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }

    pub fn transport() -> Self {
        Self {
            kind: ErrorKind::Transport,
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: CANNOT_CONNECT.to_string(),
        }
    }

    pub fn superseded() -> Self {
        Self {
            kind: ErrorKind::Superseded,
            status: StatusCode::CONFLICT,
            message: SUPERSEDED.to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
