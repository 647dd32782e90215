//! JSON extractor that reports rejections in the API error format

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::domain::error::FieldErrors;

/// Drop-in replacement for `axum::Json`
///
/// Malformed bodies come back as an [`ApiError`] with code `json_parse_error`
/// instead of axum's plain-text rejection. Well-formed bodies holding a value
/// of the wrong type are a 400 naming the field, like any other field error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(JsonRejection::JsonDataError(err)) => {
                let detail = err.body_text();
                let error = ApiError::bad_request(format!("Invalid JSON data: {}", detail));

                Err(match field_error(&detail) {
                    Some((field, message)) => {
                        error.with_fields(FieldErrors::from([(field, vec![message])]))
                    }
                    None => error,
                })
            }
            Err(rejection) => {
                let mut error = ApiError::bad_request(rejection_message(&rejection))
                    .with_code("json_parse_error");
                error.status = rejection.status();
                Err(error)
            }
        }
    }
}

/// Split a data rejection into the offending field path and serde's message
///
/// axum reports these as `<prefix>: <path>: <message> at line L column C`.
/// Errors about the body as a whole (a missing field, say) carry no path.
fn field_error(detail: &str) -> Option<(String, String)> {
    let (_, source) = detail.split_once("target type: ")?;
    let (path, message) = source.split_once(": ")?;
    if path.is_empty() || path.contains(char::is_whitespace) || path.contains('`') {
        return None;
    }

    let message = message
        .rsplit_once(" at line ")
        .map_or(message, |(message, _)| message);
    Some((path.to_string(), message.to_string()))
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        JsonRejection::BytesRejection(err) => {
            format!("Failed to read request body: {}", err.body_text())
        }
        _ => "Invalid JSON request".to_string(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
