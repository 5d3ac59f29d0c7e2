//! HTTP endpoint serving the input form and rendered manifests.
//!
//! A single route `/` accepts any method:
//! - no query string and no body: the HTML form is returned
//! - otherwise query and urlencoded body parameters are decoded and the
//!   manifest template is rendered into a `text/plain` response

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::{Bytes, to_bytes};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use tracing::{info, warn};
use url::form_urlencoded;

use crate::adapters::{FilesystemTemplateSource, MinijinjaTemplateRenderer};
use crate::app::config::ServiceConfig;
use crate::app::generator::ManifestGenerator;
use crate::domain::{AppError, Decoder, Origin};
use crate::ports::{TemplateRenderer, TemplateSource};

/// Upper bound on accepted request bodies.
const MAX_BODY_BYTES: usize = 64 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.is_bad_request() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        warn!(status = status.as_u16(), error = %self, "request failed");
        (status, self.to_string()).into_response()
    }
}

/// Shared, read-only state for all requests.
pub struct ManifestState<S: TemplateSource, R: TemplateRenderer> {
    generator: ManifestGenerator<S, R>,
    decoder: Decoder,
    template: String,
    form_path: PathBuf,
}

impl<S: TemplateSource, R: TemplateRenderer> ManifestState<S, R> {
    pub fn new(
        generator: ManifestGenerator<S, R>,
        decoder: Decoder,
        template: impl Into<String>,
        form_path: impl Into<PathBuf>,
    ) -> Self {
        Self { generator, decoder, template: template.into(), form_path: form_path.into() }
    }

    /// Decode `pairs`, attach the origin and render the manifest.
    pub fn render_request(
        &self,
        pairs: &[(String, String)],
        origin: Origin,
        caller: &str,
    ) -> Result<String, AppError> {
        let mut params =
            self.decoder.decode(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())), caller)?;
        params.origin = origin;
        self.generator.generate(&self.template, &params)
    }
}

impl ManifestState<FilesystemTemplateSource, MinijinjaTemplateRenderer> {
    /// State for the production service described by `config`.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, AppError> {
        let root = config.resolve_root()?;
        let generator = ManifestGenerator::new(
            FilesystemTemplateSource::new(&root),
            MinijinjaTemplateRenderer::new(),
            config.image_tag.clone(),
        );
        let form_path = root.join(&config.form);
        Ok(Self::new(generator, Decoder::new(config.strict), &config.template, form_path))
    }
}

/// Create the manifest router.
pub fn manifest_router<S, R>(state: Arc<ManifestState<S, R>>) -> Router
where
    S: TemplateSource + Send + Sync + 'static,
    R: TemplateRenderer + Send + Sync + 'static,
{
    Router::new().route("/", any(manifest_handler::<S, R>)).with_state(state)
}

async fn manifest_handler<S, R>(
    State(state): State<Arc<ManifestState<S, R>>>,
    request: Request,
) -> Result<Response, AppError>
where
    S: TemplateSource + Send + Sync + 'static,
    R: TemplateRenderer + Send + Sync + 'static,
{
    let (parts, body) = request.into_parts();
    let caller = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_string(), |info| info.0.to_string());

    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|err| AppError::malformed("body", "", format!("could not read body: {}", err)))?;
    let query = parts.uri.query().unwrap_or("");

    if query.is_empty() && body.is_empty() {
        return send_form(&state.form_path).await;
    }

    let mut pairs: Vec<(String, String)> =
        form_urlencoded::parse(query.as_bytes()).into_owned().collect();
    if is_form_body(&parts.headers) {
        pairs.extend(form_urlencoded::parse(&body).into_owned());
    }

    let origin = request_origin(&parts.headers, &parts.uri.to_string());
    info!(
        caller = %caller,
        origin = %origin,
        referer = header_str(&parts.headers, header::REFERER),
        "manifest request"
    );

    let manifest = state.render_request(&pairs, origin, &caller)?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], manifest).into_response())
}

async fn send_form(path: &Path) -> Result<Response, AppError> {
    let content: Bytes = tokio::fs::read(path)
        .await
        .map_err(|err| {
            AppError::config_error(format!(
                "Could not retrieve html form file {}: {}",
                path.display(),
                err
            ))
        })?
        .into();
    Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], content).into_response())
}

fn is_form_body(headers: &HeaderMap) -> bool {
    header_str(headers, header::CONTENT_TYPE).starts_with(FORM_CONTENT_TYPE)
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> &str {
    headers.get(name).and_then(|value| value.to_str().ok()).unwrap_or("")
}

fn request_origin(headers: &HeaderMap, uri: &str) -> Origin {
    match header_str(headers, header::HOST) {
        "" => Origin::unknown(),
        host => Origin::new(format!("http://{}{}", host, uri)),
    }
}

/// Bind `config.listen` and serve until ctrl-c.
pub async fn serve(config: &ServiceConfig) -> Result<(), AppError> {
    let state = Arc::new(ManifestState::from_config(config)?);
    let router = manifest_router(state);
    let listener = tokio::net::TcpListener::bind(config.listen).await?;

    info!(listen = %config.listen, strict = config.strict, template = %config.template, "serving");
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
