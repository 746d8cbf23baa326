//! The bundler seam and its `esbuild` process implementation.
//!
//! # Design
//! - Commands depend on [`Bundler`] so the dev server and tests can swap in
//!   other implementations.
//! - The process implementation forwards arguments verbatim and passes the
//!   bundler's diagnostics through to stderr.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::options::BundleOptions;

/// Failures while preparing or running a bundle.
#[derive(Debug, Error)]
pub(crate) enum BundleError {
    #[error("source directory {} does not exist", .path.display())]
    MissingSource { path: PathBuf },
    #[error("no entry points matching `{pattern}` in {}", .dir.display())]
    NoEntryPoints { dir: PathBuf, pattern: String },
    #[error("invalid entry pattern `{pattern}`")]
    Pattern {
        pattern: String,
        source: globset::Error,
    },
    #[error("failed to read {}", .path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("failed to launch bundler {}", .program.display())]
    Spawn { program: PathBuf, source: io::Error },
    #[error("bundler failed")]
    Exited { code: Option<i32>, stderr: String },
}

/// Something that can turn [`BundleOptions`] into files on disk.
#[async_trait]
pub(crate) trait Bundler: Send + Sync {
    async fn build(&self, options: &BundleOptions) -> Result<(), BundleError>;
}

/// Runs the `esbuild` executable.
pub(crate) struct EsbuildProcess {
    program: PathBuf,
}

impl EsbuildProcess {
    pub(crate) const fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

#[async_trait]
impl Bundler for EsbuildProcess {
    async fn build(&self, options: &BundleOptions) -> Result<(), BundleError> {
        let args = options.to_args();
        debug!(program = %self.program.display(), ?args, "invoking bundler");
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| BundleError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if output.status.success() {
            if !stderr.is_empty() {
                eprintln!("{stderr}");
            }
            return Ok(());
        }
        Err(BundleError::Exited {
            code: output.status.code(),
            stderr,
        })
    }
}
