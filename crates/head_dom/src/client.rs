use crate::commit::HeadCommitter;
use crate::document::HeadDocument;
use crate::patch::{CommitReport, HeadPatchError};
use crate::schedule::FrameScheduler;
use core_types::InstanceId;
use head::{CanonicalState, HeadFragment, HeadRegistry, RegistryError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Patch(#[from] HeadPatchError),
}

/// Client-side head manager: a registry whose every change is reduced and
/// handed to a committer.
pub struct HeadClient<D, S> {
    registry: HeadRegistry,
    committer: HeadCommitter<D, S>,
}

impl<D: HeadDocument, S: FrameScheduler> HeadClient<D, S> {
    pub fn new(document: D, scheduler: S) -> Self {
        Self {
            registry: HeadRegistry::new(),
            committer: HeadCommitter::new(document, scheduler),
        }
    }

    pub fn mount(&mut self, fragment: HeadFragment) -> Result<InstanceId, ClientError> {
        let instance = self.registry.mount(fragment);
        self.emit()?;
        Ok(instance)
    }

    pub fn update(&mut self, instance: InstanceId, fragment: HeadFragment) -> Result<(), ClientError> {
        self.registry.update(instance, fragment)?;
        self.emit()
    }

    pub fn unmount(&mut self, instance: InstanceId) -> Result<HeadFragment, ClientError> {
        let fragment = self.registry.unmount(instance)?;
        self.emit()?;
        Ok(fragment)
    }

    pub fn run_frame(&mut self) -> Result<Option<CommitReport>, ClientError> {
        Ok(self.committer.run_frame()?)
    }

    pub fn flush(&mut self) -> Result<Option<CommitReport>, ClientError> {
        Ok(self.committer.flush()?)
    }

    pub fn state(&self) -> CanonicalState {
        self.registry.state()
    }

    pub fn registry(&self) -> &HeadRegistry {
        &self.registry
    }

    pub fn committer(&self) -> &HeadCommitter<D, S> {
        &self.committer
    }

    pub fn committer_mut(&mut self) -> &mut HeadCommitter<D, S> {
        &mut self.committer
    }

    pub fn document(&self) -> &D {
        self.committer.document()
    }

    fn emit(&mut self) -> Result<(), ClientError> {
        let state = self.registry.state();
        self.committer.submit(state)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;
    use crate::schedule::ManualFrames;

    #[test]
    fn unknown_instance_surfaces_registry_error() {
        let mut client = HeadClient::new(MemoryDocument::new(), ManualFrames::new());
        let err = client.unmount(InstanceId(99)).unwrap_err();
        assert_eq!(err, ClientError::Registry(RegistryError::UnknownInstance(InstanceId(99))));
    }

    #[test]
    fn unmount_restores_outer_title() {
        let mut client = HeadClient::new(MemoryDocument::new(), ManualFrames::new());
        client.mount(HeadFragment::new().title("Outer")).expect("mount");
        let inner = client.mount(HeadFragment::new().title("Inner")).expect("mount");
        client.run_frame().expect("frame");
        assert_eq!(client.document().title(), Some("Inner"));

        client.unmount(inner).expect("unmount");
        client.run_frame().expect("frame");
        assert_eq!(client.document().title(), Some("Outer"));
    }
}
