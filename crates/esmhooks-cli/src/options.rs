//! Bundle options and their esbuild command-line form.

use std::path::PathBuf;

pub(crate) const DEFAULT_TARGET: &str = "safari13";
pub(crate) const DEFAULT_EXTERNALS: [&str; 2] = ["react-dom", "react"];
pub(crate) const DEFAULT_ENTRY_GLOB: &str = "*.tsx";

/// Settings shared by every build of one CLI invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BundleSettings {
    pub(crate) targets: Vec<String>,
    pub(crate) externals: Vec<String>,
    pub(crate) entry_glob: String,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            targets: vec![DEFAULT_TARGET.to_string()],
            externals: DEFAULT_EXTERNALS.iter().map(ToString::to_string).collect(),
            entry_glob: DEFAULT_ENTRY_GLOB.to_string(),
        }
    }
}

/// Release builds are minified; dev-server builds are not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BuildMode {
    Release,
    Serve,
}

impl BuildMode {
    const fn minify(self) -> bool {
        matches!(self, Self::Release)
    }
}

/// Everything one bundler run needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BundleOptions {
    pub(crate) entry_points: Vec<PathBuf>,
    pub(crate) outdir: PathBuf,
    pub(crate) targets: Vec<String>,
    pub(crate) externals: Vec<String>,
    pub(crate) minify: bool,
}

impl BundleOptions {
    pub(crate) fn new(
        entry_points: Vec<PathBuf>,
        outdir: PathBuf,
        settings: &BundleSettings,
        mode: BuildMode,
    ) -> Self {
        Self {
            entry_points,
            outdir,
            targets: settings.targets.clone(),
            externals: settings.externals.clone(),
            minify: mode.minify(),
        }
    }

    /// Arguments for the `esbuild` executable: entry points first, then flags.
    pub(crate) fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = self
            .entry_points
            .iter()
            .map(|entry| entry.display().to_string())
            .collect();
        args.push("--bundle".to_string());
        args.push("--format=esm".to_string());
        if !self.targets.is_empty() {
            args.push(format!("--target={}", self.targets.join(",")));
        }
        args.extend(
            self.externals
                .iter()
                .map(|external| format!("--external:{external}")),
        );
        if self.minify {
            args.push("--minify".to_string());
        }
        args.push(format!("--outdir={}", self.outdir.display()));
        args
    }
}
