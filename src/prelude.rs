//! Common traits and types that are useful for working with `xdmf`

pub use crate::builder::XdmfBuilder;
pub use crate::source::{AttributeValue, MemoryNode, SourceNode};
pub use crate::specification::{
    FieldDescription, FieldLocation, FieldType, GridCollectionDescription, GridDescription,
    Location, Specification, TopologyDescription,
};
pub use crate::xml::XmlElement;
pub use crate::Error;
