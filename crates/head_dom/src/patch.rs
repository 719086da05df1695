//! Head patch protocol.
//!
//! Invariants:
//! - Patches are applied in order.
//! - `RemoveTag` keys must name elements present when the patch is applied.
//! - `AppendTag` always appends to the end of the head.
//! - Attribute names are HTML names.

use crate::document::{ElementKey, HeadDocument};
use head::{AttributeKind, HeadElement, TagChanges};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeadPatch {
    SetTitle {
        text: String,
    },
    SetAttribute {
        target: AttributeKind,
        name: String,
        value: String,
    },
    RemoveAttribute {
        target: AttributeKind,
        name: String,
    },
    /// Remove a managed element. `element` is what the planner saw.
    RemoveTag {
        key: ElementKey,
        element: HeadElement,
    },
    AppendTag {
        element: HeadElement,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeadPatchError {
    #[error("element {0:?} is not in the document")]
    MissingElement(ElementKey),
    #[error("patch referenced the invalid element key")]
    InvalidKey,
}

/// Outcome of one applied patch batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub added: TagChanges,
    pub removed: TagChanges,
    /// Number of patches applied.
    pub writes: usize,
}

impl CommitReport {
    pub fn is_noop(&self) -> bool {
        self.writes == 0
    }
}

pub fn apply_patches<D: HeadDocument + ?Sized>(
    document: &mut D,
    patches: Vec<HeadPatch>,
) -> Result<CommitReport, HeadPatchError> {
    let mut report = CommitReport::default();
    for patch in patches {
        log::trace!(target: "head.commit", "apply {patch:?}");
        match patch {
            HeadPatch::SetTitle { text } => document.set_title(&text),
            HeadPatch::SetAttribute {
                target,
                name,
                value,
            } => document.set_attribute(target, &name, &value),
            HeadPatch::RemoveAttribute { target, name } => document.remove_attribute(target, &name),
            HeadPatch::RemoveTag { key, .. } => {
                if key == ElementKey::INVALID {
                    return Err(HeadPatchError::InvalidKey);
                }
                let removed = document
                    .remove_tag(key)
                    .ok_or(HeadPatchError::MissingElement(key))?;
                report.removed.push(removed);
            }
            HeadPatch::AppendTag { element } => {
                document.append_tag(&element);
                report.added.push(element);
            }
        }
        report.writes += 1;
    }
    Ok(report)
}
