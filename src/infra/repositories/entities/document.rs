//! JSONB column encoding.

use sea_orm::prelude::Json;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{AppError, AppResult};

pub(crate) fn encode<T: Serialize>(value: &T) -> AppResult<Json> {
    serde_json::to_value(value)
        .map_err(|e| AppError::internal(format!("Failed to encode document: {}", e)))
}

pub(crate) fn decode<T: DeserializeOwned>(value: Json, column: &str) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::internal(format!("Malformed {} document: {}", column, e)))
}
