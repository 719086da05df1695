use crate::error::RegistryError;
use crate::fragment::{Declaration, HeadFragment};
use crate::markup::HeadMarkup;
use crate::reduce::{CanonicalState, reduce};
use core_types::{InstanceId, Sequence};

/// Ordered registry of live declarations, one per mounted instance.
///
/// Invariants:
/// - Entries stay in registration order; `update` replaces in place and keeps
///   the entry's sequence, `unmount` removes in place.
/// - Instance ids and sequences are never reused.
#[derive(Debug, Default)]
pub struct HeadRegistry {
    declarations: Vec<Declaration>,
    next_instance: u64,
    next_sequence: Sequence,
}

impl HeadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, fragment: HeadFragment) -> InstanceId {
        self.next_instance += 1;
        let instance = InstanceId(self.next_instance);
        self.next_sequence = self.next_sequence.next();
        log::trace!(target: "head.registry", "mount {instance:?} at {:?}", self.next_sequence);
        self.declarations.push(Declaration {
            instance,
            sequence: self.next_sequence,
            fragment,
        });
        instance
    }

    pub fn update(&mut self, instance: InstanceId, fragment: HeadFragment) -> Result<(), RegistryError> {
        let slot = self
            .declarations
            .iter_mut()
            .find(|d| d.instance == instance)
            .ok_or(RegistryError::UnknownInstance(instance))?;
        log::trace!(target: "head.registry", "update {instance:?}");
        slot.fragment = fragment;
        Ok(())
    }

    pub fn unmount(&mut self, instance: InstanceId) -> Result<HeadFragment, RegistryError> {
        let pos = self
            .declarations
            .iter()
            .position(|d| d.instance == instance)
            .ok_or(RegistryError::UnknownInstance(instance))?;
        log::trace!(target: "head.registry", "unmount {instance:?}");
        Ok(self.declarations.remove(pos).fragment)
    }

    pub fn contains(&self, instance: InstanceId) -> bool {
        self.declarations.iter().any(|d| d.instance == instance)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn state(&self) -> CanonicalState {
        reduce(&self.declarations)
    }

    /// Server path: markup for the current state, registry untouched.
    pub fn peek(&self) -> HeadMarkup {
        HeadMarkup::from_state(&self.state())
    }

    /// Server path: markup for the current state, then forget every declaration.
    pub fn rewind(&mut self) -> HeadMarkup {
        let markup = self.peek();
        self.declarations.clear();
        markup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TagKind, TagRecord};

    #[test]
    fn update_keeps_position() {
        let mut registry = HeadRegistry::new();
        let a = registry.mount(HeadFragment::new().title("A"));
        let _b = registry.mount(HeadFragment::new().title("B"));
        registry
            .update(a, HeadFragment::new().title("A2"))
            .expect("registered");
        assert_eq!(registry.state().title.as_deref(), Some("B"));
        assert_eq!(registry.declarations()[0].instance, a);
        assert_eq!(registry.declarations()[0].sequence, Sequence(1));
    }

    #[test]
    fn unmount_restores_previous_title() {
        let mut registry = HeadRegistry::new();
        registry.mount(HeadFragment::new().title("Outer"));
        let inner = registry.mount(HeadFragment::new().title("Inner"));
        assert_eq!(registry.state().title.as_deref(), Some("Inner"));
        registry.unmount(inner).expect("registered");
        assert_eq!(registry.state().title.as_deref(), Some("Outer"));
        assert!(!registry.contains(inner));
    }

    #[test]
    fn unknown_instance_is_an_error() {
        let mut registry = HeadRegistry::new();
        let a = registry.mount(HeadFragment::new());
        registry.unmount(a).expect("registered");
        assert_eq!(
            registry.unmount(a).unwrap_err(),
            RegistryError::UnknownInstance(a)
        );
        assert!(registry.update(a, HeadFragment::new()).is_err());
    }

    #[test]
    fn unmount_leaves_no_stale_tags() {
        let mut registry = HeadRegistry::new();
        let a = registry.mount(
            HeadFragment::new().tag(TagKind::Meta, TagRecord::new().attr("name", "robots")),
        );
        registry.unmount(a).expect("registered");
        assert!(registry.state().tags(TagKind::Meta).is_empty());
    }

    #[test]
    fn rewind_clears_registry() {
        let mut registry = HeadRegistry::new();
        registry.mount(HeadFragment::new().title("Page"));
        let markup = registry.rewind();
        assert_eq!(markup.title.to_string(), r#"<title data-headmerge="true">Page</title>"#);
        assert!(registry.is_empty());
        assert_eq!(
            registry.peek().title.to_string(),
            r#"<title data-headmerge="true"></title>"#
        );
    }
}
