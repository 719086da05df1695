use core_types::InstanceId;
use thiserror::Error;

/// Structural problems in a declared fragment. Fatal for the render pass that
/// produced them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("<{0}> is not a supported head element")]
    UnsupportedElement(String),
    #[error("bare text is not allowed at fragment top level")]
    TopLevelText,
    #[error("<{element}> only accepts text children, found <{child}>")]
    NonTextContent { element: String, child: String },
    #[error("<{0}> is self-closing and cannot have children")]
    SelfClosingWithChildren(String),
    #[error("<{0}> accepts attributes only")]
    AttributesOnly(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("instance {0:?} is not registered")]
    UnknownInstance(InstanceId),
}
