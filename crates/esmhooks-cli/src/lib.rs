#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Thin CLI over the `esbuild` executable for bundling or serving browser entry points.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `bundler.rs`: the bundler seam and the `esbuild` process implementation
//! - `entries.rs`: entry point discovery
//! - `options.rs`: bundle options and their esbuild argument form
//! - `server.rs`: live-rebuild dev server
//! - `error.rs`: CLI errors and exit codes
//! - `output.rs`: console status lines
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod bundler;
pub(crate) mod cli;
pub(crate) mod entries;
pub(crate) mod error;
pub(crate) mod options;
pub(crate) mod output;
pub(crate) mod server;

pub use cli::run;
