//! Typed API wrapper for application services.
//!
//! The composition root stores an object-safe `RawApiPort` implementation so
//! services do not depend on adapter types. `Api` wraps an `Arc<dyn RawApiPort>`
//! and performs the serde_json conversion into typed responses.

use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::ports::outbound::{ApiError, RawApiPort};

#[derive(Clone)]
pub struct Api {
    raw: Arc<dyn RawApiPort>,
}

impl Api {
    pub fn new(raw: Arc<dyn RawApiPort>) -> Self {
        Self { raw }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.raw.get_json(path).await?;
        serde_json::from_value(value).map_err(|e| ApiError::ParseError(e.to_string()))
    }
}
