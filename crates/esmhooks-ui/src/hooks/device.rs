use yew::prelude::*;

use crate::core::device::DeviceProfile;

/// Classify the current browser from `navigator.userAgent`, once per mount.
#[hook]
pub fn use_device_detect() -> DeviceProfile {
    let profile = use_memo(
        |()| DeviceProfile::from_user_agent(current_user_agent().as_deref()),
        (),
    );
    (*profile).clone()
}

fn current_user_agent() -> Option<String> {
    web_sys::window()?.navigator().user_agent().ok()
}
