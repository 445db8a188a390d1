pub mod clips;
pub mod status;

use axum::http::StatusCode;

/// Plain-text error response, the shape the widget displays verbatim.
pub fn err_text(status: u16, message: &str) -> (StatusCode, String) {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        message.to_string(),
    )
}
