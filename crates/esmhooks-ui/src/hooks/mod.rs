//! Yew hooks over the browser APIs.
//!
//! Each hook is a thin `#[hook]` wrapper; the state it exposes is defined in
//! [`crate::core`] so it can be exercised off-browser.

mod click_outside;
mod device;
mod dom;
mod first_mount;
mod geolocation;
mod styles;
mod toggle;

pub use click_outside::use_on_click_outside;
pub use device::use_device_detect;
pub use dom::{DomDocument, DomStyle, DomSubscription};
pub use first_mount::use_first_mount;
pub use geolocation::use_geolocation;
pub use styles::use_styles;
pub use toggle::use_toggle;
