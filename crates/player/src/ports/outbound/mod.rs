//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with external systems without
//! depending on concrete implementations.

pub mod api_port;
pub mod raw_api_port;
pub mod scene_provider_port;

pub use api_port::ApiError;
pub use raw_api_port::RawApiPort;
pub use scene_provider_port::SceneProviderPort;

#[cfg(test)]
pub use raw_api_port::MockRawApiPort;
#[cfg(test)]
pub use scene_provider_port::MockSceneProviderPort;
