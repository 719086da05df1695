//! Commits canonical states to a document, batched to frames.
//!
//! Invariants:
//! - At most one commit is pending. Submitting a new state cancels the pending
//!   frame and requests a fresh one; only the latest state is committed.
//! - States with `defer == false` commit synchronously and drop any pending one.
//! - A commit that finds the document in sync performs no writes.
//! - The state's observer runs after every commit with non-empty partitions
//!   only, whether or not anything changed.

use crate::document::HeadDocument;
use crate::diff::plan_commit;
use crate::patch::{CommitReport, HeadPatchError, apply_patches};
use crate::schedule::FrameScheduler;
use core_types::FrameHandle;
use head::CanonicalState;

#[derive(Debug)]
struct Pending {
    frame: FrameHandle,
    state: CanonicalState,
}

pub struct HeadCommitter<D, S> {
    document: D,
    scheduler: S,
    pending: Option<Pending>,
    commits: u64,
}

impl<D: HeadDocument, S: FrameScheduler> HeadCommitter<D, S> {
    pub fn new(document: D, scheduler: S) -> Self {
        Self {
            document,
            scheduler,
            pending: None,
            commits: 0,
        }
    }

    /// Queue `state` for the next frame, or commit at once when it opts out of
    /// deferral. Returns the report of a synchronous commit.
    pub fn submit(&mut self, state: CanonicalState) -> Result<Option<CommitReport>, HeadPatchError> {
        if let Some(previous) = self.pending.take() {
            log::trace!(target: "head.commit", "cancel {:?}", previous.frame);
            self.scheduler.cancel_frame(previous.frame);
        }
        if !state.options.defer {
            return self.commit_now(&state).map(Some);
        }
        let frame = self.scheduler.request_frame();
        log::trace!(target: "head.commit", "scheduled {frame:?}");
        self.pending = Some(Pending { frame, state });
        Ok(None)
    }

    /// Commit the pending state if its frame has arrived.
    pub fn run_frame(&mut self) -> Result<Option<CommitReport>, HeadPatchError> {
        let due = self.scheduler.take_due();
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|pending| due.contains(&pending.frame));
        if !ready {
            return Ok(None);
        }
        match self.pending.take() {
            Some(pending) => self.commit_now(&pending.state).map(Some),
            None => Ok(None),
        }
    }

    /// Commit the pending state without waiting for its frame.
    pub fn flush(&mut self) -> Result<Option<CommitReport>, HeadPatchError> {
        match self.pending.take() {
            Some(pending) => {
                self.scheduler.cancel_frame(pending.frame);
                self.commit_now(&pending.state).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn commit_now(&mut self, state: &CanonicalState) -> Result<CommitReport, HeadPatchError> {
        let patches = plan_commit(&self.document, state);
        let planned = patches.len();
        let report = apply_patches(&mut self.document, patches)?;
        self.commits += 1;
        log::debug!(
            target: "head.commit",
            "commit #{} applied {planned} patches (+{} -{} tags)",
            self.commits,
            report.added.len(),
            report.removed.len()
        );
        if let Some(observer) = &state.options.on_change_client_state {
            observer.notify(state, &report.added, &report.removed);
        }
        Ok(report)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn commits(&self) -> u64 {
        self.commits
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn into_document(self) -> D {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;
    use crate::schedule::ManualFrames;
    use head::{HeadFragment, reduce_fragments};

    fn titled(title: &str, defer: bool) -> CanonicalState {
        reduce_fragments(&[&HeadFragment::new().title(title).defer(defer)])
    }

    #[test]
    fn deferred_state_waits_for_frame() {
        let mut committer = HeadCommitter::new(MemoryDocument::new(), ManualFrames::new());
        assert_eq!(committer.submit(titled("A", true)).expect("submit"), None);
        assert!(committer.has_pending());
        assert_eq!(committer.document().title(), None);

        let report = committer.run_frame().expect("frame").expect("committed");
        assert_eq!(report.writes, 1);
        assert_eq!(committer.document().title(), Some("A"));
        assert!(!committer.has_pending());
    }

    #[test]
    fn newer_state_replaces_pending() {
        let mut committer = HeadCommitter::new(MemoryDocument::new(), ManualFrames::new());
        committer.submit(titled("A", true)).expect("submit");
        committer.submit(titled("B", true)).expect("submit");
        assert_eq!(committer.scheduler().cancelled(), 1);
        assert_eq!(committer.scheduler().live().len(), 1);

        committer.run_frame().expect("frame");
        assert_eq!(committer.document().title(), Some("B"));
        assert_eq!(committer.commits(), 1);
    }

    #[test]
    fn synchronous_state_drops_pending() {
        let mut committer = HeadCommitter::new(MemoryDocument::new(), ManualFrames::new());
        committer.submit(titled("A", true)).expect("submit");
        let report = committer.submit(titled("Now", false)).expect("submit");
        assert!(report.is_some());
        assert_eq!(committer.document().title(), Some("Now"));
        assert!(!committer.has_pending());
        assert_eq!(committer.run_frame().expect("frame"), None);
        assert_eq!(committer.document().title(), Some("Now"));
    }

    #[test]
    fn flush_commits_without_frame() {
        let mut committer = HeadCommitter::new(MemoryDocument::new(), ManualFrames::new());
        committer.submit(titled("A", true)).expect("submit");
        committer.flush().expect("flush");
        assert_eq!(committer.document().title(), Some("A"));
        assert!(committer.scheduler().live().is_empty());
        assert_eq!(committer.flush().expect("flush"), None);
    }
}
