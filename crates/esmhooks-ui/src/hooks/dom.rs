//! `web-sys` backed [`StyleDocument`].

use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlStyleElement};

use crate::core::styles::{
    DocumentError, LoadSignal, ResourceStatus, STATUS_ATTRIBUTE, STYLE_TAG, SignalListener,
    StyleDocument, StyleElement, is_style_for_key,
};

/// The page document; style elements are appended to its `<body>`.
pub struct DomDocument {
    document: Document,
}

impl DomDocument {
    /// Document of the current window, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }
}

impl StyleDocument for DomDocument {
    type Element = DomStyle;

    fn find_style(&self, key: &str) -> Option<DomStyle> {
        let styles = self.document.get_elements_by_tag_name(STYLE_TAG);
        (0..styles.length())
            .filter_map(|index| styles.item(index))
            .filter_map(|element| element.dyn_into::<HtmlStyleElement>().ok())
            .find(|element| is_style_for_key(&element.tag_name(), &element.id(), key))
            .map(|element| DomStyle { element })
    }

    fn create_style(&self, key: &str) -> Result<DomStyle, DocumentError> {
        let element = self
            .document
            .create_element(STYLE_TAG)
            .map_err(|err| DocumentError::Create {
                key: key.to_string(),
                detail: describe(&err),
            })?
            .dyn_into::<HtmlStyleElement>()
            .map_err(|_| DocumentError::Create {
                key: key.to_string(),
                detail: "created element is not a <style>".to_string(),
            })?;
        element.set_id(key);
        Ok(DomStyle { element })
    }

    fn append_style(&self, style: &DomStyle) -> Result<(), DocumentError> {
        let body = self.document.body().ok_or_else(|| DocumentError::Attach {
            key: style.element.id(),
            detail: "document has no body".to_string(),
        })?;
        body.append_child(&style.element)
            .map(|_| ())
            .map_err(|err| DocumentError::Attach {
                key: style.element.id(),
                detail: describe(&err),
            })
    }
}

/// A `<style>` element in the page.
#[derive(Clone)]
pub struct DomStyle {
    element: HtmlStyleElement,
}

/// Load and error listeners for one observer; removed on drop.
pub struct DomSubscription {
    _load: EventListener,
    _error: EventListener,
}

impl StyleElement for DomStyle {
    type Subscription = DomSubscription;

    fn status(&self) -> Option<ResourceStatus> {
        self.element
            .get_attribute(STATUS_ATTRIBUTE)
            .as_deref()
            .and_then(ResourceStatus::parse)
    }

    fn set_status(&self, status: ResourceStatus) {
        if let Err(err) = self.element.set_attribute(STATUS_ATTRIBUTE, status.as_str()) {
            gloo::console::error!("style status write failed", self.element.id(), err);
        }
    }

    fn set_content(&self, content: &str) {
        self.element.set_text_content(Some(content));
    }

    fn listen(&self, listener: SignalListener) -> DomSubscription {
        DomSubscription {
            _load: signal_listener(&self.element, LoadSignal::Load, Rc::clone(&listener)),
            _error: signal_listener(&self.element, LoadSignal::Error, listener),
        }
    }

    fn listen_for_lifetime(&self, listener: SignalListener) {
        signal_listener(&self.element, LoadSignal::Load, Rc::clone(&listener)).forget();
        signal_listener(&self.element, LoadSignal::Error, listener).forget();
    }
}

fn signal_listener(
    element: &HtmlStyleElement,
    signal: LoadSignal,
    listener: SignalListener,
) -> EventListener {
    EventListener::new(element, signal.event_type(), move |_event| listener(signal))
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
