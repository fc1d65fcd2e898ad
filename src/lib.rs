//! UI test execution service: wires configuration, logging, the CDP
//! adapter, catalog/store selection and the HTTP server together.

pub mod config;
pub mod healthz;
pub mod wiring;

pub use config::ServiceConfig;
