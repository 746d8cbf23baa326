//! Shell-script stand-in for the `esbuild` executable.
//!
//! The script records every argument list it receives, writes a stub bundle
//! into `--outdir`, and exits with a fixed status.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// File the fake bundler writes into its output directory.
pub const BUNDLE_FILE: &str = "index.js";

/// Contents of [`BUNDLE_FILE`].
pub const BUNDLE_CONTENTS: &str = "export default 1;\n";

const INVOCATION_MARKER: &str = "--- invocation";

/// Scripted bundler living in a temporary directory.
pub struct FakeBundler {
    dir: TempDir,
}

impl FakeBundler {
    /// Bundler that always succeeds.
    ///
    /// # Errors
    /// Returns an error when the script cannot be written.
    pub fn new() -> Result<Self> {
        Self::with_exit_code(0)
    }

    /// Bundler that exits with `code` after recording its arguments.
    ///
    /// # Errors
    /// Returns an error when the script cannot be written.
    pub fn with_exit_code(code: i32) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("esmhooks-bundler-")
            .tempdir()
            .context("failed to create bundler dir")?;
        let bundler = Self { dir };
        let script = render_script(&bundler.log_path(), code);
        let program = bundler.program();
        fs::write(&program, script).context("failed to write bundler script")?;
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755))
            .context("failed to mark bundler executable")?;
        Ok(bundler)
    }

    /// Path to pass as the bundler executable.
    #[must_use]
    pub fn program(&self) -> PathBuf {
        self.dir.path().join("esbuild")
    }

    /// Argument lists received so far, oldest first.
    ///
    /// # Errors
    /// Returns an error when the log exists but cannot be read.
    pub fn invocations(&self) -> Result<Vec<Vec<String>>> {
        let log = self.log_path();
        if !log.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&log).context("failed to read bundler log")?;
        let mut calls: Vec<Vec<String>> = Vec::new();
        for line in text.lines() {
            if line == INVOCATION_MARKER {
                calls.push(Vec::new());
            } else if let Some(current) = calls.last_mut() {
                current.push(line.to_string());
            }
        }
        Ok(calls)
    }

    fn log_path(&self) -> PathBuf {
        self.dir.path().join("invocations.log")
    }
}

fn render_script(log: &Path, code: i32) -> String {
    let log = log.display();
    format!(
        r#"#!/bin/sh
log="{log}"
printf '%s\n' "{INVOCATION_MARKER}" >> "$log"
outdir=""
for arg in "$@"; do
  printf '%s\n' "$arg" >> "$log"
  case "$arg" in
    --outdir=*) outdir="${{arg#--outdir=}}" ;;
  esac
done
if [ {code} -ne 0 ]; then
  echo "fake bundler failure" >&2
  exit {code}
fi
if [ -n "$outdir" ]; then
  mkdir -p "$outdir"
  printf '{contents}' > "$outdir/{BUNDLE_FILE}"
fi
exit 0
"#,
        contents = BUNDLE_CONTENTS.replace('\n', "\\n"),
    )
}
