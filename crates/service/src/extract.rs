//! Request extractors.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON request body whose rejections answer in the `{success, data}`
/// envelope instead of axum's plain-text reply.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
