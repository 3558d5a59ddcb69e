pub mod config;
pub mod http_client;

#[cfg(test)]
pub mod testing;

pub use config::PlayerConfig;
pub use http_client::ApiAdapter;
