//! Application layer - typed API access and the services built on it.

pub mod api;
pub mod services;

pub use api::Api;
