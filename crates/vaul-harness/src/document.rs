#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};

use vaul_core::{DragEnvironment, NodeId, PointerId, ScrollMetrics, Size};
use vaul_widgets::drawer::{BodyChild, LockDocument};

/// In-memory page.
#[derive(Debug)]
pub struct FakeDocument {
    parents: RefCell<HashMap<NodeId, NodeId>>,
    scrollers: RefCell<HashMap<NodeId, ScrollMetrics>>,
    body: RefCell<Vec<BodyChild>>,
    selection: Cell<bool>,
    captured: Cell<Option<(NodeId, PointerId)>>,
    viewport: Cell<Size>,
    page_scroll: Cell<f64>,
    scrollbar: Cell<f64>,
    styles: RefCell<BTreeMap<String, String>>,
    inert: RefCell<HashSet<NodeId>>,
    scrolled_to: Cell<Option<f64>>,
}

impl Default for FakeDocument {
    fn default() -> Self {
        Self {
            parents: RefCell::default(),
            scrollers: RefCell::default(),
            body: RefCell::default(),
            selection: Cell::new(false),
            captured: Cell::new(None),
            viewport: Cell::new(Size::new(1024.0, 768.0)),
            page_scroll: Cell::new(0.0),
            scrollbar: Cell::new(0.0),
            styles: RefCell::default(),
            inert: RefCell::default(),
            scrolled_to: Cell::new(None),
        }
    }
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_viewport(self, width: f64, height: f64) -> Self {
        self.viewport.set(Size::new(width, height));
        self
    }

    /// Insert `node` under `parent`.
    pub fn add_node(&self, node: NodeId, parent: NodeId) -> &Self {
        self.parents.borrow_mut().insert(node, parent);
        self
    }

    /// Add a direct body child.
    pub fn add_body_child(&self, node: NodeId, is_script: bool) -> &Self {
        self.body.borrow_mut().push(BodyChild { node, is_script });
        self
    }

    /// Make `node` a scroll container (or update its offsets).
    pub fn set_scroll(&self, node: NodeId, metrics: ScrollMetrics) {
        self.scrollers.borrow_mut().insert(node, metrics);
    }

    pub fn set_selection(&self, active: bool) {
        self.selection.set(active);
    }

    pub fn set_page_scroll(&self, offset: f64, scrollbar_width: f64) {
        self.page_scroll.set(offset);
        self.scrollbar.set(scrollbar_width);
    }

    pub fn captured_pointer(&self) -> Option<(NodeId, PointerId)> {
        self.captured.get()
    }

    pub fn body_style(&self, property: &str) -> Option<String> {
        self.styles.borrow().get(property).cloned()
    }

    pub fn has_body_overrides(&self) -> bool {
        !self.styles.borrow().is_empty()
    }

    pub fn is_inert(&self, node: NodeId) -> bool {
        self.inert.borrow().contains(&node)
    }

    pub fn inert_count(&self) -> usize {
        self.inert.borrow().len()
    }

    pub fn scrolled_to(&self) -> Option<f64> {
        self.scrolled_to.get()
    }
}

impl DragEnvironment for FakeDocument {
    fn has_text_selection(&self) -> bool {
        self.selection.get()
    }

    fn capture_pointer(&self, target: NodeId, pointer: PointerId) {
        self.captured.set(Some((target, pointer)));
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.borrow().get(&node).copied()
    }

    fn scroll_metrics(&self, node: NodeId) -> Option<ScrollMetrics> {
        self.scrollers.borrow().get(&node).copied()
    }

    fn viewport(&self) -> Size {
        self.viewport.get()
    }
}

impl LockDocument for FakeDocument {
    fn scroll_offset(&self) -> f64 {
        self.page_scroll.get()
    }

    fn scrollbar_width(&self) -> f64 {
        self.scrollbar.get()
    }

    fn set_body_style(&self, property: &str, value: &str) {
        let mut styles = self.styles.borrow_mut();
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_owned(), value.to_owned());
        }
    }

    fn body_children(&self) -> Vec<BodyChild> {
        self.body.borrow().clone()
    }

    fn set_inert(&self, node: NodeId, inert: bool) {
        let mut set = self.inert.borrow_mut();
        if inert {
            set.insert(node);
        } else {
            set.remove(&node);
        }
    }

    fn scroll_to(&self, offset: f64) {
        self.scrolled_to.set(Some(offset));
        self.page_scroll.set(offset);
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let parents = self.parents.borrow();
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = parents.get(&n).copied();
        }
        false
    }
}
