//! PDDIKTI Gateway Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod shaping;
pub mod upstream;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
