use yew::prelude::*;

use crate::core::toggle::{Flip, ToggleState};

/// Boolean state plus a stable callback that flips it.
#[hook]
pub fn use_toggle(initial: bool) -> (bool, Callback<()>) {
    let state = use_reducer(move || ToggleState(initial));
    let toggle = {
        let dispatcher = state.dispatcher();
        use_callback(move |(): (), _: &()| dispatcher.dispatch(Flip), ())
    };
    (state.0, toggle)
}
