//! Applying canonical head state to a live document.
//!
//! `plan_commit` computes patches, `apply_patches` performs them, and
//! `HeadCommitter` batches both to frames. `HeadClient` ties a registry to a
//! committer.

mod client;
mod commit;
mod diff;
pub mod document;
pub mod memory;
mod patch;
pub mod schedule;

pub use client::{ClientError, HeadClient};
pub use commit::HeadCommitter;
pub use diff::plan_commit;
pub use document::{ElementKey, HeadDocument};
pub use memory::MemoryDocument;
pub use patch::{CommitReport, HeadPatch, HeadPatchError, apply_patches};
pub use schedule::{DEFAULT_FRAME_DELAY, FrameScheduler, IntervalFrames, ManualFrames};
