//! Target resolution
//!
//! Callers point the scheduler at an element (or a collection of elements)
//! and resolution turns that into exactly one drawable surface:
//!
//! - a surface element is tagged and used as-is
//! - a root or container is searched, newest child first, for a surface
//!   already carrying the throbber tag; on a miss a fresh surface is
//!   created, tagged, and appended
//! - a collection resolves through its first element only
//!
//! Resolving to nothing is not an error; the start request quietly becomes
//! a no-op.

use whorl_core::Element;

/// Tag marking surface elements managed by the throbber
pub const THROBBER_TAG: &str = "throbber";

/// Where a throbber should be attached
#[derive(Clone, Debug)]
pub enum Target {
    /// A single element: surface, container, or root
    Element(Element),
    /// An ordered collection; only the first element is considered
    Elements(Vec<Element>),
}

impl From<Element> for Target {
    fn from(element: Element) -> Self {
        Target::Element(element)
    }
}

impl From<&Element> for Target {
    fn from(element: &Element) -> Self {
        Target::Element(element.clone())
    }
}

impl From<Vec<Element>> for Target {
    fn from(elements: Vec<Element>) -> Self {
        Target::Elements(elements)
    }
}

impl From<&[Element]> for Target {
    fn from(elements: &[Element]) -> Self {
        Target::Elements(elements.to_vec())
    }
}

/// Resolve a target to the surface element a spinner should draw into
///
/// `create_surface` supplies fresh surface elements for container targets;
/// a failed append makes the whole resolution fail.
pub(crate) fn resolve(
    target: &Target,
    create_surface: &mut dyn FnMut() -> Element,
) -> Option<Element> {
    let element = match target {
        Target::Element(element) => element.clone(),
        Target::Elements(elements) => elements.first()?.clone(),
    };

    if element.is_surface() {
        element.add_tag(THROBBER_TAG);
        return Some(element);
    }

    // Roots and containers: reuse the newest tagged surface child.
    for child in element.children().iter().rev() {
        if child.is_surface() && child.has_tag(THROBBER_TAG) {
            return Some(child.clone());
        }
    }

    let surface = create_surface();
    surface.add_tag(THROBBER_TAG);
    element.append_child(&surface).ok()?;
    tracing::debug!("Throbber: created surface under container target");
    Some(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use whorl_core::Size;

    fn new_surface() -> Element {
        Element::recording_surface(Size::ZERO)
    }

    fn resolve_with_factory(target: &Target) -> Option<Element> {
        let mut factory = new_surface;
        resolve(target, &mut factory)
    }

    #[test]
    fn test_surface_resolves_to_itself() {
        let canvas = new_surface();
        let resolved = resolve_with_factory(&Target::from(&canvas)).unwrap();

        assert_eq!(resolved, canvas);
        assert!(canvas.has_tag(THROBBER_TAG));
    }

    #[test]
    fn test_container_grows_a_surface() {
        let panel = Element::container();
        let resolved = resolve_with_factory(&Target::from(&panel)).unwrap();

        assert!(resolved.is_surface());
        assert!(resolved.has_tag(THROBBER_TAG));
        assert_eq!(panel.child_count(), 1);
        assert_eq!(resolved.parent(), Some(panel));
    }

    #[test]
    fn test_container_reuses_tagged_surface() {
        let panel = Element::container();
        let first = resolve_with_factory(&Target::from(&panel)).unwrap();
        let second = resolve_with_factory(&Target::from(&panel)).unwrap();

        assert_eq!(first, second);
        assert_eq!(panel.child_count(), 1);
    }

    #[test]
    fn test_search_prefers_newest_child() {
        let panel = Element::container();
        let older = new_surface();
        let newer = new_surface();
        older.add_tag(THROBBER_TAG);
        newer.add_tag(THROBBER_TAG);
        panel.append_child(&older).unwrap();
        panel.append_child(&newer).unwrap();

        let resolved = resolve_with_factory(&Target::from(&panel)).unwrap();
        assert_eq!(resolved, newer);
    }

    #[test]
    fn test_untagged_surface_child_is_skipped() {
        let panel = Element::container();
        let plain = new_surface();
        panel.append_child(&plain).unwrap();

        let resolved = resolve_with_factory(&Target::from(&panel)).unwrap();
        assert_ne!(resolved, plain);
        assert_eq!(panel.child_count(), 2);
    }

    #[test]
    fn test_collection_uses_first_element_only() {
        let first = new_surface();
        let second = new_surface();
        let resolved =
            resolve_with_factory(&Target::from(vec![first.clone(), second.clone()])).unwrap();

        assert_eq!(resolved, first);
        assert!(!second.has_tag(THROBBER_TAG));
    }

    #[test]
    fn test_empty_collection_resolves_to_nothing() {
        assert!(resolve_with_factory(&Target::from(Vec::new())).is_none());
    }

    #[test]
    fn test_root_behaves_like_container() {
        let root = Element::root();
        let resolved = resolve_with_factory(&Target::from(&root)).unwrap();

        assert!(resolved.is_surface());
        assert!(resolved.is_attached());
    }
}
