use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use courier_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let code = err.code();
    match err {
        DomainError::Conflict(_) => json_error(StatusCode::CONFLICT, code, "Item already exists"),
        DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, code, "Item not found"),
        DomainError::InvalidTransition { .. } => {
            json_error(StatusCode::BAD_REQUEST, code, "Message has been approved before")
        }
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, code, msg),
        DomainError::Unavailable(msg) => {
            tracing::error!(error = %msg, "item store unavailable");
            json_error(StatusCode::SERVICE_UNAVAILABLE, code, "Item store unavailable")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
