//! Live-rebuild dev server.
//!
//! # Design
//! - Every request first checks the source tree; when anything changed since
//!   the last successful build, the bundle is rebuilt before serving.
//! - A failed build answers 503 with the bundler output so the page shows
//!   the error instead of stale code.
//! - Built files are served from the output directory as static assets.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use anyhow::Context;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use esmhooks_telemetry::request_id_layers;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::bundler::{BundleError, Bundler};
use crate::entries::discover_entry_points;
use crate::error::CliError;
use crate::options::{BuildMode, BundleOptions, BundleSettings};
use crate::output;

/// Shared dev server state.
#[derive(Clone)]
pub(crate) struct ServeState {
    inner: Arc<ServeInner>,
}

struct ServeInner {
    bundler: Arc<dyn Bundler>,
    settings: BundleSettings,
    source: PathBuf,
    outdir: PathBuf,
    last_build: Mutex<Option<Fingerprint>>,
}

impl ServeState {
    pub(crate) fn new(
        bundler: Arc<dyn Bundler>,
        settings: BundleSettings,
        source: PathBuf,
        outdir: PathBuf,
    ) -> Self {
        Self {
            inner: Arc::new(ServeInner {
                bundler,
                settings,
                source,
                outdir,
                last_build: Mutex::new(None),
            }),
        }
    }

    fn outdir(&self) -> &Path {
        &self.inner.outdir
    }

    /// Rebuild unless the source tree is unchanged since the last good build.
    async fn ensure_fresh(&self) -> Result<(), BundleError> {
        let mut last_build = self.inner.last_build.lock().await;
        let current = Fingerprint::scan(&self.inner.source)?;
        if last_build.as_ref() == Some(&current) {
            return Ok(());
        }

        let entries = discover_entry_points(&self.inner.source, &self.inner.settings.entry_glob)?;
        let options = BundleOptions::new(
            entries,
            self.inner.outdir.clone(),
            &self.inner.settings,
            BuildMode::Serve,
        );
        self.inner.bundler.build(&options).await?;
        debug!(source = %self.inner.source.display(), "rebuilt bundle");
        *last_build = Some(current);
        Ok(())
    }
}

/// Cheap summary of a source tree used to detect edits.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Fingerprint {
    files: usize,
    bytes: u64,
    newest: Option<SystemTime>,
}

impl Fingerprint {
    fn scan(root: &Path) -> Result<Self, BundleError> {
        let mut fingerprint = Self {
            files: 0,
            bytes: 0,
            newest: None,
        };
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| BundleError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let metadata = entry.metadata().map_err(|source| BundleError::Walk {
                path: entry.path().to_path_buf(),
                source,
            })?;
            fingerprint.files += 1;
            fingerprint.bytes += metadata.len();
            let modified = metadata.modified().ok();
            fingerprint.newest = fingerprint.newest.max(modified);
        }
        Ok(fingerprint)
    }
}

pub(crate) fn router(state: ServeState) -> Router {
    let (set_request_id, propagate_request_id) = request_id_layers();
    let files = ServeDir::new(state.outdir()).append_index_html_on_directories(true);
    Router::new()
        .fallback_service(files)
        .layer(middleware::from_fn_with_state(state, rebuild_then_serve))
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
}

/// Bind `0.0.0.0:port` and serve until the process is stopped.
pub(crate) async fn serve(state: ServeState, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    println!("{}", output::server_listening(port));
    info!(%addr, outdir = %state.outdir().display(), "dev server listening");
    axum::serve(listener, router(state))
        .await
        .context("dev server stopped unexpectedly")
}

async fn rebuild_then_serve(
    State(state): State<ServeState>,
    req: Request,
    next: Next,
) -> Response {
    match state.ensure_fresh().await {
        Ok(()) => next.run(req).await,
        Err(err) => {
            let message = CliError::from(err).display_message();
            warn!(error = %message, "rebuild failed");
            (StatusCode::SERVICE_UNAVAILABLE, message).into_response()
        }
    }
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(req).await;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let status = response.status().as_u16();
    println!(
        "{}",
        output::request_line(method.as_str(), status, &path, elapsed_ms)
    );
    debug!(%method, path = %path, status, elapsed_ms, "served request");
    response
}
