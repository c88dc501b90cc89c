//! Animation handles
//!
//! A [`ThrobberHandle`] is the shared reference callers hold to one running
//! spinner. Its state is a one-way tagged transition: `Active` carries the
//! instance's options and surface element, `Stopped` carries nothing. Once
//! stopped, a handle never re-activates; every inspector answers from the
//! current state, so stopped handles report inactive, unattached, and bound
//! to no element.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use whorl_core::Element;

use crate::options::ThrobberOptions;

/// Live state for one spinner: cloned options, density scale, and the
/// surface element it draws into
pub(crate) struct ActiveThrobber {
    pub(crate) options: ThrobberOptions,
    pub(crate) scale: f32,
    pub(crate) element: Element,
}

/// One-way lifecycle state of a handle
enum HandleState {
    Active(ActiveThrobber),
    Stopped,
}

/// Shared reference to one running throbber instance
///
/// Cloning shares identity; equality is pointer identity.
#[derive(Clone)]
pub struct ThrobberHandle {
    state: Rc<RefCell<HandleState>>,
}

impl ThrobberHandle {
    pub(crate) fn new(options: ThrobberOptions, scale: f32, element: Element) -> Self {
        Self {
            state: Rc::new(RefCell::new(HandleState::Active(ActiveThrobber {
                options,
                scale,
                element,
            }))),
        }
    }

    /// Whether this handle is still animating
    pub fn is_active(&self) -> bool {
        matches!(*self.state.borrow(), HandleState::Active(_))
    }

    /// Whether this handle draws into exactly the given element
    pub fn uses(&self, element: &Element) -> bool {
        match &*self.state.borrow() {
            HandleState::Active(active) => active.element == *element,
            HandleState::Stopped => false,
        }
    }

    /// Whether the handle's surface is still reachable from a display root
    pub fn is_attached(&self) -> bool {
        match &*self.state.borrow() {
            HandleState::Active(active) => active.element.is_attached(),
            HandleState::Stopped => false,
        }
    }

    /// The surface element this handle draws into, while active
    pub fn element(&self) -> Option<Element> {
        match &*self.state.borrow() {
            HandleState::Active(active) => Some(active.element.clone()),
            HandleState::Stopped => None,
        }
    }

    /// Transition to `Stopped`, handing back the retired state exactly once
    pub(crate) fn take_active(&self) -> Option<ActiveThrobber> {
        let mut state = self.state.borrow_mut();
        match std::mem::replace(&mut *state, HandleState::Stopped) {
            HandleState::Active(active) => Some(active),
            HandleState::Stopped => None,
        }
    }

    /// Run `f` against the live state, if any
    pub(crate) fn with_active<R>(&self, f: impl FnOnce(&ActiveThrobber) -> R) -> Option<R> {
        match &*self.state.borrow() {
            HandleState::Active(active) => Some(f(active)),
            HandleState::Stopped => None,
        }
    }
}

impl PartialEq for ThrobberHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for ThrobberHandle {}

impl fmt::Debug for ThrobberHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThrobberHandle")
            .field("active", &self.is_active())
            .finish()
    }
}
