use gloo::console;
use yew::prelude::*;

use crate::core::styles::{DocumentError, Observation, ResourceStatus, observe};
use crate::hooks::dom::DomDocument;

/// Insert `content` as a `<style id={key}>` once per document and track its load status.
///
/// Every component using the same key shares one element. A component that
/// mounts after the element finished loading reports the terminal status
/// straight away; so does a `<style id={key}>` already rendered by the server,
/// which reports `ready`. Re-runs when `key` or `content` changes.
#[hook]
pub fn use_styles(key: &str, content: &str) -> ResourceStatus {
    let status = use_state(|| ResourceStatus::initial(key, content));
    {
        let status = status.clone();
        use_effect_with_deps(
            move |(key, content): &(String, String)| {
                let observation = match DomDocument::current() {
                    Some(document) => {
                        let sink = status.clone();
                        observe(&document, key, content, move |next| sink.set(next))
                    }
                    None => Observation::failed(DocumentError::Unavailable),
                };
                if let Some(err) = observation.error() {
                    console::warn!("stylesheet insert failed", key.clone(), err.to_string());
                }
                status.set(observation.initial_status());
                move || drop(observation)
            },
            (key.to_string(), content.to_string()),
        );
    }
    *status
}
