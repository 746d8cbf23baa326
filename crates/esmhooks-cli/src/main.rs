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
//! `esmbuild` entrypoint; delegates to [`esmhooks_cli::run`].

#[tokio::main]
async fn main() {
    let exit_code = esmhooks_cli::run().await;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
