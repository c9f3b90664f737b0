#![forbid(unsafe_code)]

//! Background scroll and interaction lock.
//!
//! While a drawer is open the page behind it must neither scroll nor take
//! focus. The controller only sees [`BackgroundLock`]; [`ScrollLock`] is the
//! reference implementation over a [`LockDocument`].
//!
//! # Invariants
//!
//! 1. `lock()` while locked and `unlock()` while unlocked change nothing.
//! 2. `unlock()` removes exactly the inert marks `lock()` added and restores
//!    the page scroll offset captured at lock time.
//! 3. While unlocked, [`ScrollLock::should_block_scroll`] is always `false`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use vaul_core::NodeId;

/// Locks the page behind a modal drawer. Implementations must be idempotent.
pub trait BackgroundLock {
    fn lock(&self);

    fn unlock(&self);

    /// Release everything. Defaults to [`unlock`](Self::unlock).
    fn destroy(&self) {
        self.unlock();
    }

    fn is_locked(&self) -> bool;
}

/// A direct child of the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyChild {
    pub node: NodeId,
    pub is_script: bool,
}

/// The slice of the document a [`ScrollLock`] touches.
pub trait LockDocument {
    /// Vertical page scroll offset.
    fn scroll_offset(&self) -> f64;

    /// Viewport width minus the document's client width.
    fn scrollbar_width(&self) -> f64;

    /// Set an inline body style; an empty value clears the override.
    fn set_body_style(&self, property: &str, value: &str);

    fn body_children(&self) -> Vec<BodyChild>;

    fn set_inert(&self, node: NodeId, inert: bool);

    fn scroll_to(&self, offset: f64);

    /// `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;
}

impl<D: LockDocument + ?Sized> LockDocument for Rc<D> {
    fn scroll_offset(&self) -> f64 {
        (**self).scroll_offset()
    }
    fn scrollbar_width(&self) -> f64 {
        (**self).scrollbar_width()
    }
    fn set_body_style(&self, property: &str, value: &str) {
        (**self).set_body_style(property, value);
    }
    fn body_children(&self) -> Vec<BodyChild> {
        (**self).body_children()
    }
    fn set_inert(&self, node: NodeId, inert: bool) {
        (**self).set_inert(node, inert);
    }
    fn scroll_to(&self, offset: f64) {
        (**self).scroll_to(offset);
    }
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        (**self).contains(ancestor, node)
    }
}

type ScrollPredicate = dyn Fn(NodeId) -> bool;

/// Options for [`ScrollLock`].
#[derive(Clone, Default)]
pub struct ScrollLockOptions {
    allow_scroll_within: Vec<NodeId>,
    exclude_from_inert: Vec<NodeId>,
    should_allow_scroll: Option<Rc<ScrollPredicate>>,
}

impl ScrollLockOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Containers that keep scrolling (and stay interactive) while locked.
    #[must_use]
    pub fn allow_scroll_within(mut self, node: NodeId) -> Self {
        self.allow_scroll_within.push(node);
        self
    }

    /// Body children that are never marked inert.
    #[must_use]
    pub fn exclude_from_inert(mut self, node: NodeId) -> Self {
        self.exclude_from_inert.push(node);
        self
    }

    /// Custom escape hatch consulted before the allow-list.
    #[must_use]
    pub fn should_allow_scroll(mut self, f: impl Fn(NodeId) -> bool + 'static) -> Self {
        self.should_allow_scroll = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for ScrollLockOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLockOptions")
            .field("allow_scroll_within", &self.allow_scroll_within)
            .field("exclude_from_inert", &self.exclude_from_inert)
            .field("should_allow_scroll", &self.should_allow_scroll.is_some())
            .finish()
    }
}

const BODY_OVERRIDES: [&str; 5] = ["overflow", "padding-right", "top", "position", "width"];

/// Body-level scroll lock with inert backgrounding.
pub struct ScrollLock<D> {
    document: D,
    options: RefCell<ScrollLockOptions>,
    scroll_position: Cell<f64>,
    scrollbar_width: Cell<f64>,
    inert: RefCell<Vec<NodeId>>,
    locked: Cell<bool>,
}

impl<D: LockDocument> ScrollLock<D> {
    pub fn new(document: D) -> Self {
        Self::with_options(document, ScrollLockOptions::default())
    }

    pub fn with_options(document: D, options: ScrollLockOptions) -> Self {
        Self {
            document,
            options: RefCell::new(options),
            scroll_position: Cell::new(0.0),
            scrollbar_width: Cell::new(0.0),
            inert: RefCell::new(Vec::new()),
            locked: Cell::new(false),
        }
    }

    /// Replace the options. Takes effect on the next `lock()` for inert
    /// marking and immediately for scroll filtering.
    pub fn update_options(&self, options: ScrollLockOptions) {
        *self.options.borrow_mut() = options;
    }

    /// Whether a wheel/touchmove on `target` should have its default
    /// prevented.
    pub fn should_block_scroll(&self, target: NodeId) -> bool {
        if !self.locked.get() {
            return false;
        }
        let options = self.options.borrow();
        if options.should_allow_scroll.as_ref().is_some_and(|f| f(target)) {
            return false;
        }
        !options
            .allow_scroll_within
            .iter()
            .any(|&allowed| self.document.contains(allowed, target))
    }

    /// Scroll offset captured by the last `lock()`.
    pub fn saved_scroll_position(&self) -> f64 {
        self.scroll_position.get()
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    fn apply_inert(&self) {
        let options = self.options.borrow();
        let mut inert = self.inert.borrow_mut();
        for child in self.document.body_children() {
            let allowed = options
                .allow_scroll_within
                .iter()
                .any(|&node| self.document.contains(child.node, node));
            let excluded = options.exclude_from_inert.contains(&child.node);
            if allowed || excluded || child.is_script {
                continue;
            }
            self.document.set_inert(child.node, true);
            inert.push(child.node);
        }
    }

    fn remove_inert(&self) {
        for node in self.inert.borrow_mut().drain(..) {
            self.document.set_inert(node, false);
        }
    }
}

impl<D: LockDocument> BackgroundLock for ScrollLock<D> {
    fn lock(&self) {
        if self.locked.get() {
            return;
        }
        let offset = self.document.scroll_offset();
        let scrollbar = self.document.scrollbar_width();
        self.scroll_position.set(offset);
        self.scrollbar_width.set(scrollbar);

        let doc = &self.document;
        doc.set_body_style("overflow", "hidden");
        doc.set_body_style("padding-right", &format!("{scrollbar}px"));
        doc.set_body_style("top", &format!("-{offset}px"));
        doc.set_body_style("position", "fixed");
        doc.set_body_style("width", "100%");

        self.apply_inert();
        self.locked.set(true);
        tracing::debug!(offset, scrollbar, "background scroll locked");
    }

    fn unlock(&self) {
        if !self.locked.get() {
            return;
        }
        self.remove_inert();
        for property in BODY_OVERRIDES {
            self.document.set_body_style(property, "");
        }
        self.document.scroll_to(self.scroll_position.get());
        self.locked.set(false);
        tracing::debug!("background scroll unlocked");
    }

    fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

impl<D> fmt::Debug for ScrollLock<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLock")
            .field("locked", &self.locked.get())
            .field("scroll_position", &self.scroll_position.get())
            .field("scrollbar_width", &self.scrollbar_width.get())
            .field("inert", &self.inert.borrow().len())
            .finish_non_exhaustive()
    }
}
