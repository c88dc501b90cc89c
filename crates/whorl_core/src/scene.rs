//! Element Tree - Retained Display Structure
//!
//! Elements form the retained tree widgets live in. Three kinds exist:
//! display roots, generic containers, and drawable surfaces backed by a
//! shared [`PaintSurface`](crate::paint::PaintSurface). Surfaces are leaves.
//!
//! An `Element` is a cheap shared handle; cloning shares identity and
//! equality is pointer identity. Parent links are weak, so dropping every
//! handle to a subtree frees it even while parents are alive.
//!
//! Liveness questions ("is this surface still on screen?") reduce to
//! [`Element::is_attached`], which walks parent links up to a root.
//!
//! # Example
//!
//! ```rust
//! use whorl_core::{Element, Size};
//!
//! let root = Element::root();
//! let panel = Element::container();
//! let canvas = Element::recording_surface(Size::square(40.0));
//!
//! root.append_child(&panel).unwrap();
//! panel.append_child(&canvas).unwrap();
//! assert!(canvas.is_attached());
//!
//! canvas.detach();
//! assert!(!canvas.is_attached());
//! ```

use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{Result, SceneError};
use crate::geometry::Size;
use crate::paint::{PaintSurface, RecordingSurface};

// ─────────────────────────────────────────────────────────────────────────────
// Element Kind
// ─────────────────────────────────────────────────────────────────────────────

/// What an element is in the tree
#[derive(Clone)]
pub enum ElementKind {
    /// Display root; `is_attached` terminates here
    Root,
    /// Generic grouping node
    Container,
    /// Drawable leaf with a shared paint backing
    Surface(Rc<RefCell<dyn PaintSurface>>),
}

impl fmt::Debug for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Root => write!(f, "Root"),
            ElementKind::Container => write!(f, "Container"),
            ElementKind::Surface(_) => write!(f, "Surface"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Element
// ─────────────────────────────────────────────────────────────────────────────

struct ElementInner {
    kind: ElementKind,
    parent: Weak<RefCell<ElementInner>>,
    children: SmallVec<[Element; 4]>,
    tags: SmallVec<[String; 2]>,
}

/// Shared handle to one node of the element tree
///
/// Cloning shares identity; equality is pointer identity.
#[derive(Clone)]
pub struct Element {
    inner: Rc<RefCell<ElementInner>>,
}

impl Element {
    fn with_kind(kind: ElementKind) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ElementInner {
                kind,
                parent: Weak::new(),
                children: SmallVec::new(),
                tags: SmallVec::new(),
            })),
        }
    }

    /// Create a display root
    pub fn root() -> Self {
        Self::with_kind(ElementKind::Root)
    }

    /// Create a generic container
    pub fn container() -> Self {
        Self::with_kind(ElementKind::Container)
    }

    /// Create a drawable surface around an existing paint backing
    pub fn surface(backing: Rc<RefCell<dyn PaintSurface>>) -> Self {
        Self::with_kind(ElementKind::Surface(backing))
    }

    /// Create a drawable surface backed by a fresh [`RecordingSurface`]
    pub fn recording_surface(size: Size) -> Self {
        Self::surface(Rc::new(RefCell::new(RecordingSurface::new(size))))
    }

    pub fn is_root(&self) -> bool {
        matches!(self.inner.borrow().kind, ElementKind::Root)
    }

    pub fn is_container(&self) -> bool {
        matches!(self.inner.borrow().kind, ElementKind::Container)
    }

    pub fn is_surface(&self) -> bool {
        matches!(self.inner.borrow().kind, ElementKind::Surface(_))
    }

    /// The paint backing, if this element is a surface
    pub fn paint_surface(&self) -> Option<Rc<RefCell<dyn PaintSurface>>> {
        match &self.inner.borrow().kind {
            ElementKind::Surface(backing) => Some(Rc::clone(backing)),
            _ => None,
        }
    }

    /// The parent element, if attached to one
    pub fn parent(&self) -> Option<Element> {
        self.inner
            .borrow()
            .parent
            .upgrade()
            .map(|inner| Element { inner })
    }

    /// Snapshot of the current children, in insertion order
    pub fn children(&self) -> Vec<Element> {
        self.inner.borrow().children.iter().cloned().collect()
    }

    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// Append a child, moving it out of its previous parent if it has one
    ///
    /// Fails on surfaces (leaves) and on appends that would make an element
    /// its own ancestor.
    pub fn append_child(&self, child: &Element) -> Result<()> {
        if self.is_surface() {
            return Err(SceneError::NotAContainer);
        }

        // Walk up from self; finding `child` there means the append would
        // close a cycle (covers self-appends too).
        let mut ancestor = Some(self.clone());
        while let Some(node) = ancestor {
            if node == *child {
                return Err(SceneError::CycleDetected);
            }
            ancestor = node.parent();
        }

        if child.parent().is_some() {
            tracing::trace!("Element: reparenting child on append");
            child.detach();
        }

        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
        self.inner.borrow_mut().children.push(child.clone());
        Ok(())
    }

    /// Remove a direct child
    pub fn remove_child(&self, child: &Element) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let Some(index) = inner.children.iter().position(|c| c == child) else {
            return Err(SceneError::NotAChild);
        };
        inner.children.remove(index);
        drop(inner);

        child.inner.borrow_mut().parent = Weak::new();
        Ok(())
    }

    /// Remove this element from its parent; no-op when already detached
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            let _ = parent.remove_child(self);
        }
    }

    /// Whether a display root is reachable by walking parent links
    pub fn is_attached(&self) -> bool {
        let mut node = self.clone();
        loop {
            if node.is_root() {
                return true;
            }
            match node.parent() {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Add a string tag; repeated adds are idempotent
    pub fn add_tag(&self, tag: &str) {
        let mut inner = self.inner.borrow_mut();
        if !inner.tags.iter().any(|t| t == tag) {
            inner.tags.push(tag.to_string());
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.inner.borrow().tags.iter().any(|t| t == tag)
    }

    /// Downgrade to a weak handle that does not keep the element alive
    pub fn downgrade(&self) -> WeakElement {
        WeakElement {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Element")
            .field("kind", &inner.kind)
            .field("children", &inner.children.len())
            .field("tags", &inner.tags)
            .finish()
    }
}

/// Weak handle to an element
#[derive(Clone, Default)]
pub struct WeakElement {
    inner: Weak<RefCell<ElementInner>>,
}

impl WeakElement {
    /// A weak handle that never upgrades
    pub fn new() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn upgrade(&self) -> Option<Element> {
        self.inner.upgrade().map(|inner| Element { inner })
    }
}
