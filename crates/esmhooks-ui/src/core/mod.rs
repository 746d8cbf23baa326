//! Core, DOM-free primitives behind the hooks.
pub mod device;
pub mod first_mount;
pub mod geolocation;
pub mod memory;
pub mod pointer;
pub mod styles;
pub mod toggle;
