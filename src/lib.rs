pub mod analytics;
pub mod api;
pub mod config;
pub mod domain;
pub mod poller;
pub mod routing;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod upstream;
