use axum::extract::{FromRequest, FromRequestParts};

use crate::web::error::AppError;

/// `axum::Json` whose rejections render as `AppError` (422 with a `detail` body).
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Query` whose rejections render as `AppError`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
