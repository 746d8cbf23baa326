//! Boolean toggle reducer.

use std::rc::Rc;

use yew::functional::Reducible;

/// Flip request for [`ToggleState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flip;

/// Boolean state that can only be flipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToggleState(pub bool);

impl Reducible for ToggleState {
    type Action = Flip;

    fn reduce(self: Rc<Self>, _action: Flip) -> Rc<Self> {
        Rc::new(Self(!self.0))
    }
}
