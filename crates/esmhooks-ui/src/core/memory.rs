//! In-memory [`StyleDocument`] for host-side rendering and tests.
//!
//! Elements never load on their own; callers drive completion with
//! [`MemoryStyle::fire`], the way a browser would dispatch `load`/`error`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::styles::{
    DocumentError, LoadSignal, ResourceStatus, STYLE_TAG, SignalListener, StyleDocument,
    StyleElement, is_style_for_key,
};

/// Shared document holding attached elements in insertion order.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    inner: Rc<DocumentState>,
}

#[derive(Default)]
struct DocumentState {
    nodes: RefCell<Vec<Node>>,
    mutations: Cell<usize>,
    fail_appends: Cell<bool>,
}

enum Node {
    Markup { tag: String, id: String },
    Style(MemoryStyle),
}

impl Node {
    fn tag(&self) -> &str {
        match self {
            Self::Markup { tag, .. } => tag,
            Self::Style(_) => STYLE_TAG,
        }
    }

    fn id(&self) -> &str {
        match self {
            Self::Markup { id, .. } => id,
            Self::Style(style) => style.key(),
        }
    }

    fn is_style_for(&self, key: &str) -> bool {
        is_style_for_key(self.tag(), self.id(), key)
    }
}

impl MemoryDocument {
    /// Empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First attached style element with the given key.
    #[must_use]
    pub fn style(&self, key: &str) -> Option<MemoryStyle> {
        self.inner
            .nodes
            .borrow()
            .iter()
            .find_map(|node| match node {
                Node::Style(style) if node.is_style_for(key) => Some(style.clone()),
                _ => None,
            })
    }

    /// Number of attached style elements.
    #[must_use]
    pub fn style_count(&self) -> usize {
        self.inner
            .nodes
            .borrow()
            .iter()
            .filter(|node| matches!(node, Node::Style(_)))
            .count()
    }

    /// Number of attached style elements carrying `key`.
    #[must_use]
    pub fn styles_with_key(&self, key: &str) -> usize {
        self.inner
            .nodes
            .borrow()
            .iter()
            .filter(|node| node.is_style_for(key))
            .count()
    }

    /// Element creations plus appends performed through [`StyleDocument`].
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.inner.mutations.get()
    }

    /// Make subsequent appends fail, as a detached or read-only document would.
    pub fn fail_appends(&self, fail: bool) {
        self.inner.fail_appends.set(fail);
    }

    /// Attach page markup that is not a stylesheet, e.g. `<div id="theme">`.
    ///
    /// Not counted by [`MemoryDocument::mutation_count`].
    pub fn add_markup(&self, tag: &str, id: &str) {
        self.inner.nodes.borrow_mut().push(Node::Markup {
            tag: tag.to_string(),
            id: id.to_string(),
        });
    }

    /// Attach a `<style id={key}>` rendered outside the loader, with no
    /// status attribute.
    ///
    /// Not counted by [`MemoryDocument::mutation_count`].
    #[must_use]
    pub fn add_rendered_style(&self, key: &str, content: &str) -> MemoryStyle {
        let style = MemoryStyle::new(key);
        style.set_content(content);
        self.inner
            .nodes
            .borrow_mut()
            .push(Node::Style(style.clone()));
        style
    }

    fn record_mutation(&self) {
        self.inner.mutations.set(self.inner.mutations.get() + 1);
    }
}

impl StyleDocument for MemoryDocument {
    type Element = MemoryStyle;

    fn find_style(&self, key: &str) -> Option<MemoryStyle> {
        self.style(key)
    }

    fn create_style(&self, key: &str) -> Result<MemoryStyle, DocumentError> {
        self.record_mutation();
        Ok(MemoryStyle::new(key))
    }

    fn append_style(&self, element: &MemoryStyle) -> Result<(), DocumentError> {
        if self.inner.fail_appends.get() {
            return Err(DocumentError::Attach {
                key: element.key().to_string(),
                detail: "document rejected append".to_string(),
            });
        }
        self.record_mutation();
        self.inner
            .nodes
            .borrow_mut()
            .push(Node::Style(element.clone()));
        Ok(())
    }
}

/// Style element stored in a [`MemoryDocument`].
#[derive(Clone)]
pub struct MemoryStyle {
    node: Rc<StyleNode>,
}

struct StyleNode {
    key: String,
    content: RefCell<String>,
    status: Cell<Option<ResourceStatus>>,
    listeners: RefCell<Vec<(u64, SignalListener)>>,
    next_listener: Cell<u64>,
}

impl MemoryStyle {
    fn new(key: &str) -> Self {
        Self {
            node: Rc::new(StyleNode {
                key: key.to_string(),
                content: RefCell::new(String::new()),
                status: Cell::new(None),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// Identifier the element was created with.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.node.key
    }

    /// Stylesheet text currently held by the element.
    #[must_use]
    pub fn content(&self) -> String {
        self.node.content.borrow().clone()
    }

    /// Listeners currently registered, lifetime listeners included.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.node.listeners.borrow().len()
    }

    /// Dispatch a completion signal to every registered listener.
    pub fn fire(&self, signal: LoadSignal) {
        let listeners: Vec<SignalListener> = self
            .node
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(signal);
        }
    }

    fn register(&self, listener: SignalListener) -> u64 {
        let id = self.node.next_listener.get();
        self.node.next_listener.set(id + 1);
        self.node.listeners.borrow_mut().push((id, listener));
        id
    }
}

impl StyleElement for MemoryStyle {
    type Subscription = MemorySubscription;

    fn status(&self) -> Option<ResourceStatus> {
        self.node.status.get()
    }

    fn set_status(&self, status: ResourceStatus) {
        self.node.status.set(Some(status));
    }

    fn set_content(&self, content: &str) {
        *self.node.content.borrow_mut() = content.to_string();
    }

    fn listen(&self, listener: SignalListener) -> MemorySubscription {
        let id = self.register(listener);
        MemorySubscription {
            node: Rc::downgrade(&self.node),
            id,
        }
    }

    fn listen_for_lifetime(&self, listener: SignalListener) {
        self.register(listener);
    }
}

/// Listener registration on a [`MemoryStyle`]; removed on drop.
pub struct MemorySubscription {
    node: Weak<StyleNode>,
    id: u64,
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        if let Some(node) = self.node.upgrade() {
            node.listeners
                .borrow_mut()
                .retain(|(listener_id, _)| *listener_id != self.id);
        }
    }
}
