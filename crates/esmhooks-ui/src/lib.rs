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
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Browser utility hooks for Yew function components.
//!
//! Layout:
//! - `core/`: DOM-free state machines (stylesheet loading, device sniffing,
//!   geolocation state, toggles, first-mount tracking, click-outside checks)
//!   that build and test on the host.
//! - `hooks/`: the `#[hook]` wrappers and `web-sys` adapters, compiled for wasm32 only.

pub mod core;

#[cfg(target_arch = "wasm32")]
pub mod hooks;

pub use crate::core::styles::{ResourceStatus, observe};

#[cfg(target_arch = "wasm32")]
pub use hooks::{
    use_device_detect, use_first_mount, use_geolocation, use_on_click_outside, use_styles,
    use_toggle,
};
