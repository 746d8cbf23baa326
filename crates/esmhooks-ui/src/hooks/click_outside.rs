use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent, Node};
use yew::prelude::*;

use crate::core::pointer::{ClickTrigger, is_outside_click};

/// Call `handler` for clicks that land outside the element behind `node`.
///
/// Clicks on the element or its descendants are ignored, as is everything
/// while the element is not mounted.
#[hook]
pub fn use_on_click_outside(node: NodeRef, handler: Callback<MouseEvent>, trigger: ClickTrigger) {
    use_effect_with_deps(
        move |(node, handler, trigger): &(NodeRef, Callback<MouseEvent>, ClickTrigger)| {
            let node = node.clone();
            let handler = handler.clone();
            let listener = EventListener::new(
                &gloo::utils::window(),
                trigger.event_type(),
                move |event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let element = node.cast::<Element>();
                    let target = event.target().and_then(|target| target.dyn_into::<Node>().ok());
                    let target_inside = element
                        .as_ref()
                        .is_some_and(|element| element.contains(target.as_ref()));
                    if is_outside_click(element.is_some(), target_inside) {
                        handler.emit(event.clone());
                    }
                },
            );
            move || drop(listener)
        },
        (node, handler, trigger),
    );
}
