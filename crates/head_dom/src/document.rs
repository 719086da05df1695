use head::{AttributeKind, HeadElement, TagKind};

/// Stable identity of an element inside one document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(pub u32);

impl ElementKey {
    /// Reserved sentinel for "unassigned/invalid" identity.
    pub const INVALID: ElementKey = ElementKey(0);
}

/// The slice of a live document the committer reads and writes.
///
/// Implementations must keep head children in document order and must never
/// hand out `ElementKey::INVALID`.
pub trait HeadDocument {
    /// Text of the title element, `None` when there is no title element.
    fn title(&self) -> Option<&str>;
    /// Creates the title element when missing.
    fn set_title(&mut self, title: &str);

    fn has_element(&self, target: AttributeKind) -> bool;
    fn attribute(&self, target: AttributeKind, name: &str) -> Option<&str>;
    /// No-op when the target element does not exist.
    fn set_attribute(&mut self, target: AttributeKind, name: &str, value: &str);
    fn remove_attribute(&mut self, target: AttributeKind, name: &str);

    /// Head children of `kind` that carry the marker attribute, in document order.
    fn managed_tags(&self, kind: TagKind) -> Vec<(ElementKey, HeadElement)>;
    /// Appends to the end of the head.
    fn append_tag(&mut self, element: &HeadElement) -> ElementKey;
    fn remove_tag(&mut self, key: ElementKey) -> Option<HeadElement>;
}
