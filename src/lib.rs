//! Merge head declarations from nested components into one document head.
//!
//! `head` reduces declarations and renders markup, `head_dom` commits the
//! reduced state to a live document.

pub use core_types::{FrameHandle, InstanceId, Sequence};
pub use head::*;
pub use head_dom::{
    ClientError, CommitReport, DEFAULT_FRAME_DELAY, ElementKey, FrameScheduler, HeadClient,
    HeadCommitter, HeadDocument, HeadPatch, HeadPatchError, IntervalFrames, ManualFrames,
    MemoryDocument, apply_patches, plan_commit,
};
