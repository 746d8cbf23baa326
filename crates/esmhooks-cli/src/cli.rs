//! Argument parsing and command dispatch for `esmbuild`.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use esmhooks_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, command_span, init_logging,
};
use tracing::{Instrument, debug, info};

use crate::bundler::{Bundler, EsbuildProcess};
use crate::entries::discover_entry_points;
use crate::error::{CliError, CliResult};
use crate::options::{
    BuildMode, BundleOptions, BundleSettings, DEFAULT_ENTRY_GLOB, DEFAULT_EXTERNALS, DEFAULT_TARGET,
};
use crate::output;
use crate::server::{self, ServeState};

const DEFAULT_SOURCE_DIR: &str = "src";
const DEFAULT_OUT_DIR: &str = "dist";
const DEFAULT_PORT: u16 = 8000;

/// Parses arguments, runs the requested command, and returns the process
/// exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: LogFormat::from_name(cli.log_format.as_deref()),
        build_sha: option_env!("ESMHOOKS_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("error: {err:#}");
        return CliError::failure(err).exit_code();
    }

    let span = command_span(cli.command.name());
    let result = match env::current_dir().context("failed to resolve the working directory") {
        Ok(cwd) => dispatch(cli, &cwd).instrument(span).await,
        Err(err) => Err(CliError::failure(err)),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

#[derive(Parser)]
#[command(
    name = "esmbuild",
    about = "Bundle or serve ES module entry points with esbuild"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "ESMBUILD_ESBUILD",
        default_value = "esbuild",
        help = "Path to the esbuild executable"
    )]
    esbuild: PathBuf,
    #[arg(
        long,
        global = true,
        env = "ESMBUILD_TARGET",
        value_delimiter = ',',
        default_value = DEFAULT_TARGET
    )]
    target: Vec<String>,
    #[arg(
        long,
        global = true,
        env = "ESMBUILD_EXTERNAL",
        value_delimiter = ',',
        default_values = DEFAULT_EXTERNALS,
        help = "Modules left as imports instead of being bundled"
    )]
    external: Vec<String>,
    #[arg(
        long,
        global = true,
        env = "ESMBUILD_ENTRY_GLOB",
        default_value = DEFAULT_ENTRY_GLOB
    )]
    entry_glob: String,
    #[arg(
        long,
        global = true,
        env = "ESMBUILD_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "ESMBUILD_LOG_FORMAT",
        help = "`json` or `pretty`; defaults by build profile"
    )]
    log_format: Option<String>,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn settings(&self) -> BundleSettings {
        BundleSettings {
            targets: self.target.clone(),
            externals: self.external.clone(),
            entry_glob: self.entry_glob.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Serve the bundle, rebuilding when sources change.
    Server(ServerArgs),
    /// Write a minified bundle once.
    Build(BuildArgs),
}

impl Command {
    const fn name(&self) -> &'static str {
        match self {
            Self::Server(_) => "server",
            Self::Build(_) => "build",
        }
    }
}

#[derive(Args)]
struct ServerArgs {
    /// Source directory (default `./src`).
    path: Option<PathBuf>,
    /// Port to listen on.
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[derive(Args)]
struct BuildArgs {
    /// Source directory (default `./src`).
    path: Option<PathBuf>,
    /// Output directory (default `./dist`).
    outdir: Option<PathBuf>,
}

async fn dispatch(cli: Cli, cwd: &Path) -> CliResult<()> {
    let settings = cli.settings();
    let bundler: Arc<dyn Bundler> = Arc::new(EsbuildProcess::new(cli.esbuild));
    match cli.command {
        Command::Build(args) => {
            let source = resolve_source(cwd, args.path.as_deref());
            let outdir = resolve_outdir(cwd, args.outdir.as_deref());
            handle_build(bundler.as_ref(), &settings, &source, &outdir).await
        }
        Command::Server(args) => {
            let source = resolve_source(cwd, args.path.as_deref());
            handle_server(bundler, settings, source, args.port).await
        }
    }
}

fn resolve_source(cwd: &Path, path: Option<&Path>) -> PathBuf {
    cwd.join(path.unwrap_or_else(|| Path::new(DEFAULT_SOURCE_DIR)))
}

fn resolve_outdir(cwd: &Path, path: Option<&Path>) -> PathBuf {
    cwd.join(path.unwrap_or_else(|| Path::new(DEFAULT_OUT_DIR)))
}

async fn handle_build(
    bundler: &dyn Bundler,
    settings: &BundleSettings,
    source: &Path,
    outdir: &Path,
) -> CliResult<()> {
    let entries = discover_entry_points(source, &settings.entry_glob)?;
    info!(
        entries = entries.len(),
        source = %source.display(),
        outdir = %outdir.display(),
        "building bundle"
    );
    let options = BundleOptions::new(entries, outdir.to_path_buf(), settings, BuildMode::Release);
    bundler.build(&options).await?;
    println!("{}", output::build_done(outdir));
    Ok(())
}

async fn handle_server(
    bundler: Arc<dyn Bundler>,
    settings: BundleSettings,
    source: PathBuf,
    port: u16,
) -> CliResult<()> {
    let entries = discover_entry_points(&source, &settings.entry_glob)?;
    debug!(entries = entries.len(), source = %source.display(), "entry points found");

    let outdir = tempfile::Builder::new()
        .prefix("esmbuild-serve-")
        .tempdir()
        .context("failed to create the dev server output directory")
        .map_err(CliError::failure)?;
    let state = ServeState::new(bundler, settings, source, outdir.path().to_path_buf());
    server::serve(state, port).await.map_err(CliError::failure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("esmbuild").chain(args.iter().copied()))
    }

    #[test]
    fn server_defaults_to_port_8000_and_src() {
        let cli = parse(&["server"]).expect("parse");
        match cli.command {
            Command::Server(args) => {
                assert_eq!(args.port, DEFAULT_PORT);
                assert_eq!(
                    resolve_source(Path::new("/work"), args.path.as_deref()),
                    PathBuf::from("/work/src")
                );
            }
            Command::Build(_) => panic!("expected server"),
        }
    }

    #[test]
    fn build_takes_path_and_outdir_positionally() {
        let cli = parse(&["build", "web", "public/js"]).expect("parse");
        match cli.command {
            Command::Build(args) => {
                let cwd = Path::new("/work");
                assert_eq!(
                    resolve_source(cwd, args.path.as_deref()),
                    PathBuf::from("/work/web")
                );
                assert_eq!(
                    resolve_outdir(cwd, args.outdir.as_deref()),
                    PathBuf::from("/work/public/js")
                );
            }
            Command::Server(_) => panic!("expected build"),
        }
    }

    #[test]
    fn absolute_paths_are_kept() {
        assert_eq!(
            resolve_outdir(Path::new("/work"), Some(Path::new("/srv/static"))),
            PathBuf::from("/srv/static")
        );
        assert_eq!(
            resolve_outdir(Path::new("/work"), None),
            PathBuf::from("/work/dist")
        );
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        assert!(parse(&["server", "src", "70000"]).is_err());
        assert!(parse(&["server", "src", "http"]).is_err());
    }

    #[test]
    fn command_names_label_the_root_span() {
        assert_eq!(parse(&["server"]).expect("parse").command.name(), "server");
        assert_eq!(parse(&["build"]).expect("parse").command.name(), "build");
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(parse(&["watch"]).is_err());
    }

    #[test]
    fn bundle_settings_accept_lists() {
        let cli = parse(&[
            "--target",
            "es2020,chrome100",
            "--external",
            "preact",
            "build",
        ])
        .expect("parse");
        let settings = cli.settings();
        assert_eq!(settings.targets, vec!["es2020", "chrome100"]);
        assert_eq!(settings.externals, vec!["preact"]);
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use anyhow::Result;
        use esmhooks_test_support::bundler::{BUNDLE_FILE, FakeBundler};
        use esmhooks_test_support::fixtures::SourceTree;
        use std::ffi::OsString;

        fn cli_for(fake: &FakeBundler, args: &[&str]) -> Result<Cli> {
            let mut argv: Vec<OsString> = vec!["esmbuild".into(), "--esbuild".into()];
            argv.push(fake.program().into_os_string());
            argv.extend(args.iter().map(|arg| OsString::from(*arg)));
            Ok(Cli::try_parse_from(argv)?)
        }

        #[tokio::test]
        async fn build_bundles_sorted_entries_minified() -> Result<()> {
            let fake = FakeBundler::new()?;
            let tree = SourceTree::new(&[
                ("src/useToggle.tsx", ""),
                ("src/useStyles.tsx", ""),
                ("src/helpers.ts", ""),
            ])?;

            let result = dispatch(cli_for(&fake, &["build"])?, tree.path()).await;
            assert!(result.is_ok());

            let outdir = tree.join("dist");
            assert_eq!(
                fake.invocations()?,
                vec![vec![
                    tree.join("src/useStyles.tsx").display().to_string(),
                    tree.join("src/useToggle.tsx").display().to_string(),
                    "--bundle".to_string(),
                    "--format=esm".to_string(),
                    "--target=safari13".to_string(),
                    "--external:react-dom".to_string(),
                    "--external:react".to_string(),
                    "--minify".to_string(),
                    format!("--outdir={}", outdir.display()),
                ]]
            );
            assert!(outdir.join(BUNDLE_FILE).is_file());
            Ok(())
        }

        #[tokio::test]
        async fn bundler_exit_code_becomes_the_cli_exit_code() -> Result<()> {
            let fake = FakeBundler::with_exit_code(7)?;
            let tree = SourceTree::new(&[("src/index.tsx", "")])?;

            let err = dispatch(cli_for(&fake, &["build"])?, tree.path())
                .await
                .err()
                .ok_or_else(|| anyhow::anyhow!("expected failure"))?;
            assert_eq!(err.exit_code(), 7);
            Ok(())
        }

        #[tokio::test]
        async fn missing_source_is_a_validation_error() -> Result<()> {
            let fake = FakeBundler::new()?;
            let tree = SourceTree::new(&[])?;

            for args in [&["build"][..], &["server", "app", "0"][..]] {
                let err = dispatch(cli_for(&fake, args)?, tree.path())
                    .await
                    .err()
                    .ok_or_else(|| anyhow::anyhow!("expected failure"))?;
                assert_eq!(err.exit_code(), 2);
            }
            assert!(fake.invocations()?.is_empty());
            Ok(())
        }

        #[tokio::test]
        async fn directory_without_entries_is_a_validation_error() -> Result<()> {
            let fake = FakeBundler::new()?;
            let tree = SourceTree::new(&[("src/styles.css", "")])?;

            let err = dispatch(cli_for(&fake, &["build"])?, tree.path())
                .await
                .err()
                .ok_or_else(|| anyhow::anyhow!("expected failure"))?;
            assert_eq!(err.exit_code(), 2);
            assert!(err.display_message().starts_with("no entry points matching `*.tsx`"));
            Ok(())
        }
    }
}
