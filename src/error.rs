use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures the analysis engine reports at its boundary.
///
/// Numerical edge cases (zero ranges, zero average loss) are not errors: the
/// indicators resolve them to neutral values internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("insufficient data: at least one candle is required")]
    InsufficientData,

    #[error("invalid input: candle {index} has {field} = {value}")]
    InvalidInput {
        field: &'static str,
        index: usize,
        value: f64,
    },
}

/// Errors surfaced by the service layer to the API and the chat front end.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not enough data for {pair}: got {got} candles, need {need}")]
    NotEnoughCandles { pair: String, got: usize, need: usize },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("upstream error: {0:#}")]
    Upstream(anyhow::Error),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidSymbol(_) | ServiceError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotEnoughCandles { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Analysis(AnalysisError::InsufficientData) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::Analysis(AnalysisError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
