#![doc = include_str!("../README.md")]

pub mod builder;
pub mod extract;
pub mod prelude;
pub mod source;
mod specification;
mod utils;
pub mod xml;

pub use builder::{BuildError, XdmfBuilder};
pub use extract::ExtractError;
pub use source::{AttributeValue, MemoryNode, SourceError, SourceNode};
pub use specification::{
    FieldDescription, FieldLocation, FieldType, GridCollectionDescription, GridDescription,
    Location, Specification, TopologyDescription,
};
pub use xml::XmlElement;

pub use quick_xml::writer::Writer;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Error while reading the source tree: `{0}`")]
    Source(#[from] source::SourceError),
    #[error("Error while extracting the specification: `{0}`")]
    Extract(#[from] extract::ExtractError),
    #[error("Error while assembling the xdmf document: `{0}`")]
    Build(#[from] builder::BuildError),
    #[error("Could not convert document to utf8 encoding: `{0}`")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Could not write XML data: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
}
