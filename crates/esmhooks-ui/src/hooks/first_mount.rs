use yew::prelude::*;

use crate::core::first_mount::FirstMount;

/// `true` on the first render of the calling component, `false` afterwards.
#[hook]
pub fn use_first_mount() -> bool {
    let tracker = use_mut_ref(FirstMount::default);
    tracker.borrow_mut().take()
}
