//! CLI errors and their process exit codes.

use crate::bundler::BundleError;

#[derive(Debug)]
pub(crate) enum CliError {
    /// Bad input from the user; exit code 2.
    Validation(String),
    /// Anything else that went wrong locally; exit code 3.
    Failure(anyhow::Error),
    /// The bundler ran and failed; its own exit code is propagated.
    Bundler { code: Option<i32>, message: String },
}

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::Bundler {
                code: Some(code), ..
            } if *code != 0 => *code,
            Self::Bundler { .. } => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Bundler { message, .. } => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl From<BundleError> for CliError {
    fn from(err: BundleError) -> Self {
        match err {
            BundleError::MissingSource { .. }
            | BundleError::NoEntryPoints { .. }
            | BundleError::Pattern { .. } => Self::validation(err.to_string()),
            BundleError::Exited { code, stderr } => {
                let message = if stderr.is_empty() {
                    "bundler failed".to_string()
                } else {
                    format!("bundler failed: {stderr}")
                };
                Self::Bundler { code, message }
            }
            BundleError::Walk { .. } | BundleError::Spawn { .. } => Self::failure(err),
        }
    }
}
