pub mod config;
pub mod generator;
pub mod http;

pub use config::ServiceConfig;
pub use generator::ManifestGenerator;
pub use http::{ManifestState, manifest_router};
