//! Raw API Port - Object-safe HTTP boundary
//!
//! A generic typed port is not object-safe. The composition root needs an
//! abstraction that can be stored behind `Arc<dyn ...>`, so adapters implement
//! this JSON-level trait and `application::api::Api` layers typed decoding on top.

use serde_json::Value;

use super::ApiError;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RawApiPort: Send + Sync {
    /// GET `path` relative to the adapter's base URL.
    async fn get_json(&self, path: &str) -> Result<Value, ApiError>;
}
