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

//! Shared test helpers for the esmhooks tools.
//! Layout: fixtures.rs (scratch source trees), bundler.rs (scripted stand-in for esbuild).

#[cfg(unix)]
pub mod bundler;
pub mod fixtures;
