pub mod attr_names;
pub mod element;
pub mod escape;
pub mod identity;
pub mod markup;
pub mod registry;
pub mod seo;

mod error;
mod fragment;
mod reduce;
mod types;

pub use crate::element::{HeadElement, MARKER_ATTRIBUTE, MARKER_VALUE, TagChanges};
pub use crate::error::{DeclarationError, RegistryError};
pub use crate::fragment::{ChangeObserver, Declaration, FragmentOptions, HeadChild, HeadFragment};
pub use crate::identity::{IdentityKey, TagIdentity, resolve_identity};
pub use crate::markup::{
    AttributeMarkup, ElementDescriptor, HeadMarkup, PriorityMarkup, TagMarkup, TitleMarkup,
};
pub use crate::reduce::{CanonicalState, ResolvedOptions, reduce, reduce_fragments};
pub use crate::registry::HeadRegistry;
pub use crate::seo::{AttributeMatcher, Partition, PrioritizedTags, SeoMatchers};
pub use crate::types::{
    AttrValue, AttributeKind, AttributeMap, PerAttribute, PerTag, PrimaryAttribute, TagKind,
    TagRecord, Title,
};
