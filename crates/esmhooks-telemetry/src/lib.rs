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

//! Logging setup and request-id layers shared by the esmhooks tools.
//!
//! Layout: init.rs (subscriber installation), context.rs (per-command root span),
//! layers.rs (tower request-id layers).

mod context;
mod init;
mod layers;

pub use context::command_span;
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
pub use layers::request_id_layers;
