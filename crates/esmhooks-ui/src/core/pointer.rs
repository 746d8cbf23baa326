//! Click-outside decisions, independent of the event source.

/// Mouse event that counts as a click for outside detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClickTrigger {
    /// Fire as soon as the button goes down.
    #[default]
    MouseDown,
    /// Fire when the button is released.
    MouseUp,
}

impl ClickTrigger {
    /// DOM event name to listen for.
    #[must_use]
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
        }
    }
}

/// Whether a click should reach the outside handler.
///
/// Unmounted elements never trigger; clicks on the element or its descendants
/// are inside.
#[must_use]
pub const fn is_outside_click(element_mounted: bool, target_inside: bool) -> bool {
    element_mounted && !target_inside
}
