//! pxetcd: render etcd bootstrap manifests for Portworx clusters from form parameters.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

use app::ManifestState;

pub use app::ServiceConfig;
pub use domain::AppError;

/// Render one manifest from `key=value` pairs using the service configuration.
///
/// Behaves like a single HTTP request whose origin is `origin`.
pub fn render(
    config: &ServiceConfig,
    pairs: &[(String, String)],
    origin: &str,
) -> Result<String, AppError> {
    let state = ManifestState::from_config(config)?;
    state.render_request(pairs, domain::Origin::new(origin), "cli")
}

/// Serve the form and manifest endpoint until interrupted.
pub async fn serve(config: &ServiceConfig) -> Result<(), AppError> {
    app::http::serve(config).await
}
