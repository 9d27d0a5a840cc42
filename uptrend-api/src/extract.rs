/// Request body extraction
///
/// Axum's stock `Json` extractor answers malformed or incomplete bodies
/// with its own 422/415 responses, outside the central error translator.
/// [`JsonBody`] is the same extractor with the rejection converted into
/// [`ApiError::BadRequest`], so a body missing a required field renders
/// as a 400 in the standard error envelope like every other input problem.
///
/// Handlers use it for requests only; responses keep `axum::Json`.

use crate::error::ApiError;
use axum::extract::FromRequest;

/// JSON request body whose parse failures map to [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
