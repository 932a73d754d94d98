//! The normalized, format-agnostic description of everything to emit:
//! grids grouped into named collections, each grid carrying topology,
//! geometry, and classified fields. Built once by the extraction phase,
//! consumed once by [`XdmfBuilder`](crate::XdmfBuilder), then discarded.

use std::collections::BTreeMap;

/// where a dataset lives: its storage file and internal path. Emitted
/// verbatim in data references, never dereferenced here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub path: String,
}

/// semantic rank of a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldType {
    #[default]
    None,
    Scalar,
    Vector,
    Tensor,
    Matrix,
}

/// mesh attachment point of a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldLocation {
    #[default]
    Node,
    Cell,
}

/// One addressable field, geometry, or packed-array view.
///
/// When `has_time_dimension` is set the description is a single slice of a
/// packed `(time, sample, component)` array: `time_offset` selects the time
/// slice and `component_offset`/`component_stride` select a sub-range of the
/// innermost axis. Component splitting produces many such views over one
/// physical dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDescription {
    pub name: String,
    pub location: Location,
    pub shape: Vec<usize>,
    pub time_offset: usize,
    pub component_offset: usize,
    pub component_stride: usize,
    pub component_dimension: usize,
    pub field_location: FieldLocation,
    pub field_type: FieldType,
    pub has_time_dimension: bool,
}

impl FieldDescription {
    /// number of samples (nodes, cells, or particles): the leading axis, or
    /// the axis after the time axis for packed time series
    pub fn dof(&self) -> usize {
        if self.shape.len() > 2 {
            self.shape[1]
        } else {
            self.shape.first().copied().unwrap_or(0)
        }
    }

    /// degrees of freedom per sample; scalars are always one-wide no matter
    /// how the storage is shaped
    pub fn dimension(&self) -> usize {
        match self.field_type {
            FieldType::Scalar => 1,
            _ => self.component_dimension,
        }
    }
}

/// connectivity of one element population
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyDescription {
    pub location: Location,
    /// element count
    pub number: usize,
    /// nodes per element; zero means a point cloud with no connectivity
    pub number_corners: usize,
    /// topological dimension (1, 2, or 3)
    pub dimension: usize,
}

/// one mesh (or particle cloud) snapshot at one time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridDescription {
    pub time: f64,
    pub topology: TopologyDescription,
    /// secondary element population sharing the same geometry;
    /// `number == 0` means no hybrid region is present
    pub hybrid_topology: TopologyDescription,
    pub geometry: FieldDescription,
    pub fields: Vec<FieldDescription>,
}

/// a named group of grids indexed by time. One time index may hold several
/// grids (multi-block or hybrid partitions sharing a time step).
#[derive(Debug, Clone, PartialEq)]
pub struct GridCollectionDescription {
    pub name: String,
    pub grids: BTreeMap<usize, Vec<GridDescription>>,
}

impl Default for GridCollectionDescription {
    fn default() -> Self {
        GridCollectionDescription {
            name: String::from("domain"),
            grids: BTreeMap::new(),
        }
    }
}

/// the complete translation input for the assembly phase
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Specification {
    pub grids_collections: Vec<GridCollectionDescription>,
}
