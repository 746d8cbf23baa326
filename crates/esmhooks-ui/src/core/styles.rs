//! Deduplicated stylesheet insertion with per-observer load status.
//!
//! # Design
//! - One `<style>` element per key lives in the shared document. Its
//!   `data-status` attribute is the only shared record of load progress.
//! - Each observer keeps a local status plus its own listeners, so late joiners
//!   read the attribute while early joiners wait for the load/error signal.
//! - The attribute writer is registered once per element and lives as long as
//!   the element; observer listeners are released when the [`Observation`] drops.
//! - Terminal statuses are first-writer-wins at both levels.

use std::cell::Cell;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use thiserror::Error;

/// Attribute carrying the shared status on the style element.
pub const STATUS_ATTRIBUTE: &str = "data-status";

/// Tag of the elements the loader manages.
pub const STYLE_TAG: &str = "style";

/// Whether an element with `tag_name` and `id` is the style element for `key`.
///
/// Other elements may carry the same id; only a `<style>` counts.
#[must_use]
pub fn is_style_for_key(tag_name: &str, id: &str, key: &str) -> bool {
    tag_name.eq_ignore_ascii_case(STYLE_TAG) && id == key
}

/// Load status of a stylesheet as seen by one observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceStatus {
    /// No key or content was supplied.
    Idle,
    /// The element is attached and waiting for a completion signal.
    Loading,
    /// The browser reported a successful load.
    Ready,
    /// The browser reported a network or parse failure.
    Error,
}

impl ResourceStatus {
    /// Attribute value for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }

    /// Parse an attribute value written by [`ResourceStatus::as_str`].
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "idle" => Some(Self::Idle),
            "loading" => Some(Self::Loading),
            "ready" => Some(Self::Ready),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// `ready` and `error` never change once reached.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }

    /// Status reported on the first render, before the loader has run.
    ///
    /// Matches what [`observe`] reports for the same input: `idle` when either
    /// side is empty.
    #[must_use]
    pub const fn initial(key: &str, content: &str) -> Self {
        if key.is_empty() || content.is_empty() {
            Self::Idle
        } else {
            Self::Loading
        }
    }
}

impl Display for ResourceStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Completion signal fired by the browser for a style element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSignal {
    /// The `load` event.
    Load,
    /// The `error` event.
    Error,
}

impl LoadSignal {
    /// DOM event name for the signal.
    #[must_use]
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Error => "error",
        }
    }

    /// Map a DOM event name back to a signal.
    #[must_use]
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "load" => Some(Self::Load),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Terminal status implied by the signal.
    #[must_use]
    pub const fn status(self) -> ResourceStatus {
        match self {
            Self::Load => ResourceStatus::Ready,
            Self::Error => ResourceStatus::Error,
        }
    }
}

/// Failures raised by a [`StyleDocument`] while inserting an element.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// No document is reachable from the current context.
    #[error("document unavailable")]
    Unavailable,
    /// The style element could not be created.
    #[error("style element creation failed")]
    Create {
        /// Key of the stylesheet being inserted.
        key: String,
        /// Detail reported by the document.
        detail: String,
    },
    /// The style element could not be attached to the document.
    #[error("style element attach failed")]
    Attach {
        /// Key of the stylesheet being inserted.
        key: String,
        /// Detail reported by the document.
        detail: String,
    },
}

/// Callback invoked when a style element fires a completion signal.
pub type SignalListener = Rc<dyn Fn(LoadSignal)>;

/// A style element living in a [`StyleDocument`].
pub trait StyleElement: Clone + 'static {
    /// Handle that keeps a listener registered until dropped.
    type Subscription;

    /// Current value of the status attribute, if it holds a known status.
    fn status(&self) -> Option<ResourceStatus>;

    /// Overwrite the status attribute.
    fn set_status(&self, status: ResourceStatus);

    /// Replace the stylesheet text.
    fn set_content(&self, content: &str);

    /// Register a listener for both completion signals, detached when the
    /// returned subscription drops.
    fn listen(&self, listener: SignalListener) -> Self::Subscription;

    /// Register a listener for both completion signals for the lifetime of the element.
    fn listen_for_lifetime(&self, listener: SignalListener);
}

/// Shared document that owns the style elements.
pub trait StyleDocument {
    /// Concrete element type.
    type Element: StyleElement;

    /// Look up an attached `<style>` whose id is `key`, as decided by
    /// [`is_style_for_key`]. Other elements sharing the id are skipped.
    fn find_style(&self, key: &str) -> Option<Self::Element>;

    /// Create a detached style element identified by `key`.
    ///
    /// # Errors
    /// Returns [`DocumentError::Create`] when the document refuses to build the element.
    fn create_style(&self, key: &str) -> Result<Self::Element, DocumentError>;

    /// Attach a previously created element.
    ///
    /// # Errors
    /// Returns [`DocumentError::Attach`] when the element cannot be inserted.
    fn append_style(&self, element: &Self::Element) -> Result<(), DocumentError>;
}

/// One observer's view of a stylesheet.
///
/// Holds the observer's listeners; dropping it detaches them without touching
/// the shared element or other observers.
#[must_use = "dropping an observation detaches its listeners"]
pub struct Observation<S> {
    status: ResourceStatus,
    subscription: Option<S>,
    error: Option<DocumentError>,
}

impl<S> Observation<S> {
    /// Observation for a missing key or content.
    pub const fn idle() -> Self {
        Self {
            status: ResourceStatus::Idle,
            subscription: None,
            error: None,
        }
    }

    /// Observation that could not reach the document; reports `error`.
    pub const fn failed(error: DocumentError) -> Self {
        Self {
            status: ResourceStatus::Error,
            subscription: None,
            error: Some(error),
        }
    }

    /// Status at the moment the observation was taken.
    #[must_use]
    pub const fn initial_status(&self) -> ResourceStatus {
        self.status
    }

    /// Whether listeners are registered for this observer.
    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Document failure that forced the `error` status, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&DocumentError> {
        self.error.as_ref()
    }
}

/// Ensure `content` is attached under `key` exactly once and watch its status.
///
/// Returns the status at call time; later transitions are delivered to
/// `on_status` until the returned [`Observation`] is dropped. Empty `key` or
/// `content` yields `idle` with no document access.
pub fn observe<D, F>(
    document: &D,
    key: &str,
    content: &str,
    on_status: F,
) -> Observation<<D::Element as StyleElement>::Subscription>
where
    D: StyleDocument,
    F: Fn(ResourceStatus) + 'static,
{
    if key.is_empty() || content.is_empty() {
        return Observation::idle();
    }

    let (element, initial) = match document.find_style(key) {
        Some(existing) => {
            let status = adopted_status(existing.status());
            (existing, status)
        }
        None => match insert_style(document, key, content) {
            Ok(created) => (created, ResourceStatus::Loading),
            Err(error) => return Observation::failed(error),
        },
    };

    let local = Rc::new(Cell::new(initial));
    let subscription = element.listen(Rc::new(move |signal: LoadSignal| {
        if local.get().is_terminal() {
            return;
        }
        let next = signal.status();
        local.set(next);
        on_status(next);
    }));

    Observation {
        status: initial,
        subscription: Some(subscription),
        error: None,
    }
}

/// Status a late observer adopts from an existing element's attribute.
///
/// Elements inserted here always carry the attribute. One without it was
/// rendered by someone else (server markup, a static `<style>`); inline
/// stylesheets apply synchronously, so it has already loaded.
const fn adopted_status(attribute: Option<ResourceStatus>) -> ResourceStatus {
    match attribute {
        None => ResourceStatus::Ready,
        Some(ResourceStatus::Idle) => ResourceStatus::Loading,
        Some(status) => status,
    }
}

fn insert_style<D: StyleDocument>(
    document: &D,
    key: &str,
    content: &str,
) -> Result<D::Element, DocumentError> {
    let element = document.create_style(key)?;
    element.set_status(ResourceStatus::Loading);
    element.set_content(content);
    document.append_style(&element)?;

    let target = element.clone();
    element.listen_for_lifetime(Rc::new(move |signal: LoadSignal| {
        if target.status().is_some_and(ResourceStatus::is_terminal) {
            return;
        }
        target.set_status(signal.status());
    }));
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::MemoryDocument;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<ResourceStatus>>>, impl Fn(ResourceStatus) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |status| sink.borrow_mut().push(status))
    }

    #[test]
    fn status_round_trips_through_attribute_text() {
        for status in [
            ResourceStatus::Idle,
            ResourceStatus::Loading,
            ResourceStatus::Ready,
            ResourceStatus::Error,
        ] {
            assert_eq!(ResourceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ResourceStatus::parse("done"), None);
        assert_eq!(ResourceStatus::Ready.to_string(), "ready");
    }

    #[test]
    fn only_style_tags_match_a_key() {
        assert!(is_style_for_key("STYLE", "theme", "theme"));
        assert!(is_style_for_key("style", "theme", "theme"));
        assert!(!is_style_for_key("DIV", "theme", "theme"));
        assert!(!is_style_for_key("STYLE", "theme-dark", "theme"));
    }

    #[test]
    fn initial_status_is_idle_when_either_input_is_empty() {
        assert_eq!(ResourceStatus::initial("", ""), ResourceStatus::Idle);
        assert_eq!(ResourceStatus::initial("theme", ""), ResourceStatus::Idle);
        assert_eq!(ResourceStatus::initial("", "a{}"), ResourceStatus::Idle);
        assert_eq!(ResourceStatus::initial("theme", "a{}"), ResourceStatus::Loading);
    }

    #[test]
    fn first_render_status_agrees_with_observe() {
        let document = MemoryDocument::new();
        for (key, content) in [("", ""), ("theme", ""), ("", "a{}"), ("theme", "a{}")] {
            let (_seen, sink) = recorder();
            let observation = observe(&document, key, content, sink);
            assert_eq!(
                ResourceStatus::initial(key, content),
                observation.initial_status(),
                "key={key:?} content={content:?}"
            );
        }
    }

    #[test]
    fn adopted_status_reads_unmanaged_elements_as_ready() {
        assert_eq!(adopted_status(None), ResourceStatus::Ready);
        assert_eq!(
            adopted_status(Some(ResourceStatus::Idle)),
            ResourceStatus::Loading
        );
        assert_eq!(
            adopted_status(Some(ResourceStatus::Loading)),
            ResourceStatus::Loading
        );
        assert_eq!(
            adopted_status(Some(ResourceStatus::Error)),
            ResourceStatus::Error
        );
    }

    #[test]
    fn signals_map_to_terminal_statuses() {
        assert_eq!(LoadSignal::from_event_type("load"), Some(LoadSignal::Load));
        assert_eq!(LoadSignal::from_event_type("error"), Some(LoadSignal::Error));
        assert_eq!(LoadSignal::from_event_type("click"), None);
        assert!(LoadSignal::Load.status().is_terminal());
        assert!(LoadSignal::Error.status().is_terminal());
        assert!(!ResourceStatus::Loading.is_terminal());
    }

    #[test]
    fn first_observer_inserts_and_marks_loading() {
        let document = MemoryDocument::new();
        let (seen, sink) = recorder();
        let observation = observe(&document, "theme", ".x{color:red}", sink);

        assert_eq!(observation.initial_status(), ResourceStatus::Loading);
        assert!(observation.is_subscribed());
        let style = document.style("theme").expect("style inserted");
        assert_eq!(style.content(), ".x{color:red}");
        assert_eq!(style.status(), Some(ResourceStatus::Loading));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn attribute_keeps_first_terminal_signal() {
        let document = MemoryDocument::new();
        let (_seen, sink) = recorder();
        let _observation = observe(&document, "theme", "a{}", sink);
        let style = document.style("theme").expect("style inserted");

        style.fire(LoadSignal::Error);
        style.fire(LoadSignal::Load);

        assert_eq!(style.status(), Some(ResourceStatus::Error));
    }

    #[test]
    fn observer_ignores_signals_after_terminal() {
        let document = MemoryDocument::new();
        let (seen, sink) = recorder();
        let _observation = observe(&document, "theme", "a{}", sink);
        let style = document.style("theme").expect("style inserted");

        style.fire(LoadSignal::Load);
        style.fire(LoadSignal::Error);

        assert_eq!(*seen.borrow(), vec![ResourceStatus::Ready]);
    }

    #[test]
    fn document_failure_degrades_to_error() {
        let document = MemoryDocument::new();
        document.fail_appends(true);
        let (seen, sink) = recorder();
        let observation = observe(&document, "theme", "a{}", sink);

        assert_eq!(observation.initial_status(), ResourceStatus::Error);
        assert!(!observation.is_subscribed());
        assert!(matches!(
            observation.error(),
            Some(DocumentError::Attach { key, .. }) if key == "theme"
        ));
        assert_eq!(document.style_count(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn idle_and_failed_constructors_report_expected_state() {
        let idle = Observation::<()>::idle();
        assert_eq!(idle.initial_status(), ResourceStatus::Idle);
        assert!(idle.error().is_none());

        let failed = Observation::<()>::failed(DocumentError::Unavailable);
        assert_eq!(failed.initial_status(), ResourceStatus::Error);
        assert_eq!(failed.error(), Some(&DocumentError::Unavailable));
    }
}
