use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::errors::AppError;

/// Success envelope: `{ "ok": true, "value": ... }`.
/// Failures are rendered by `AppError` with the matching `{ "ok": false, "error": ... }` shape.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub value: T,
}

pub type ApiResult<T> = Result<Json<Envelope<T>>, AppError>;
pub type ApiCreated<T> = Result<(StatusCode, Json<Envelope<T>>), AppError>;

pub fn ok<T: Serialize>(value: T) -> Json<Envelope<T>> {
    Json(Envelope { ok: true, value })
}

pub fn created<T: Serialize>(value: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok(value))
}
