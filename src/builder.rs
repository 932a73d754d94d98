//! # Assembly
//!
//! Walks a [`Specification`] and produces the nested XDMF markup tree: one
//! `Xdmf` root with the fixed preamble, one `Domain`, and per grid
//! collection either a flat uniform grid or a temporal collection of them,
//! each carrying topology, geometry, and field sub-trees whose `DataItem`
//! references address the original storage directly or through HyperSlab
//! start/stride/size selections.

use derive_more::{Constructor, Display, From};

use crate::specification::{
    FieldDescription, FieldLocation, FieldType, Specification, TopologyDescription,
};
use crate::utils::{join_counts, join_times};
use crate::xml::XmlElement;

const DATA_ITEM: &str = "DataItem";
const GRID: &str = "Grid";

// fixed document preamble expected by ParaView and VisIt
const DOCTYPE: &str = r#"Xdmf SYSTEM "Xdmf.dtd" []"#;

/// errors detected while assembling the document
#[derive(Debug, thiserror::Error, From)]
pub enum BuildError {
    #[error("{0}")]
    UnsupportedCellType(UnsupportedCellType),
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "no element type is defined for dimension {dimension} with {corners} corner nodes")]
pub struct UnsupportedCellType {
    dimension: usize,
    corners: usize,
}

/// element type keyed by topological dimension and corner count; any other
/// combination is an unsupported mesh convention
fn cell_type(dimension: usize, corners: usize) -> Result<&'static str, BuildError> {
    let name = match (dimension, corners) {
        (1, 0) | (1, 1) | (2, 0) | (3, 0) => "Polyvertex",
        (1, 2) | (2, 2) => "Polyline",
        (2, 3) => "Triangle",
        (2, 4) => "Quadrilateral",
        (3, 4) => "Tetrahedron",
        (3, 6) => "Wedge",
        (3, 8) => "Hexahedron",
        _ => return Err(UnsupportedCellType::new(dimension, corners).into()),
    };
    Ok(name)
}

/// nodes per element for the combinations that declare it; a negative value
/// means "use the element count itself" (edge-only and point cloud meshes)
fn nodes_per_element(dimension: usize, corners: usize) -> Option<i64> {
    match (dimension, corners) {
        (1, 0) | (2, 0) | (3, 0) => Some(-1),
        (1, 2) | (2, 2) => Some(2),
        _ => None,
    }
}

fn type_name(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::None => "None",
        FieldType::Scalar => "Scalar",
        FieldType::Vector => "Vector",
        FieldType::Tensor => "Tensor6",
        FieldType::Matrix => "Matrix",
    }
}

fn center_name(location: FieldLocation) -> &'static str {
    match location {
        FieldLocation::Node => "Node",
        FieldLocation::Cell => "Cell",
    }
}

/// make a dataset path safe to use as a markup name
fn hdf5_path_to_name(path: &str) -> String {
    path.replace('/', "_")
}

/// Assembles a [`Specification`] into an `Xdmf` document tree.
pub struct XdmfBuilder {
    specification: Specification,
}

impl XdmfBuilder {
    pub fn new(specification: Specification) -> Self {
        XdmfBuilder { specification }
    }

    /// build the document: one `Xdmf` root wrapping a single `Domain`
    pub fn build(&self) -> Result<XmlElement, BuildError> {
        let mut document = XmlElement::document("Xdmf", DOCTYPE);

        // a single domain works better for visit
        let domain = document.child("Domain");
        domain.set_attribute("Name", "domain");

        for collection in &self.specification.grids_collections {
            // time values in ascending time index order, one per index
            let time_vector: Vec<f64> = collection
                .grids
                .values()
                .filter_map(|grids| grids.first().map(|grid| grid.time))
                .collect();

            // negative time is the "no time axis" sentinel
            let use_time = time_vector.first().map_or(false, |time| *time >= 0.0);

            let grid_base = if use_time {
                Self::generate_time_grid(&mut *domain, &time_vector)
            } else {
                &mut *domain
            };

            for grids in collection.grids.values() {
                // several spatial partitions may share one time index
                let shared_base = if grids.len() > 1 {
                    Self::generate_spatial_grid(&mut *grid_base, &collection.name, Some("Spatial"))
                } else {
                    &mut *grid_base
                };

                for grid in grids {
                    // a hybrid region turns the grid into a pair of uniform
                    // grids under a collection of their own
                    let grid_parent = if grid.hybrid_topology.number > 0 {
                        let hybrid_base =
                            Self::generate_spatial_grid(&mut *shared_base, &collection.name, None);
                        Self::generate_space_grid(
                            &mut *hybrid_base,
                            &grid.hybrid_topology,
                            &grid.geometry,
                            &collection.name,
                        )?;
                        hybrid_base
                    } else {
                        &mut *shared_base
                    };

                    let space_grid = Self::generate_space_grid(
                        grid_parent,
                        &grid.topology,
                        &grid.geometry,
                        &collection.name,
                    )?;

                    for field in &grid.fields {
                        Self::write_field(space_grid, field);
                    }
                }
            }
        }

        Ok(document)
    }

    /// temporal collection wrapper holding the explicit time value list
    fn generate_time_grid<'a>(element: &'a mut XmlElement, time: &[f64]) -> &'a mut XmlElement {
        let grid = element.child(GRID);
        grid.set_attribute("Name", "TimeSeries");
        grid.set_attribute("GridType", "Collection");
        grid.set_attribute("CollectionType", "Temporal");

        let time_element = grid.child("Time");
        time_element.set_attribute("TimeType", "List");

        let data_item = time_element.child(DATA_ITEM);
        data_item.set_attribute("Format", "XML");
        data_item.set_attribute("NumberType", "Float");
        data_item.set_attribute("Dimensions", &time.len().to_string());
        data_item.set_text(&join_times(time));

        grid
    }

    /// spatial collection wrapper; the hybrid pair wrapper carries no
    /// `CollectionType`
    fn generate_spatial_grid<'a>(
        element: &'a mut XmlElement,
        name: &str,
        collection_type: Option<&str>,
    ) -> &'a mut XmlElement {
        let grid = element.child(GRID);
        grid.set_attribute("Name", name);
        grid.set_attribute("GridType", "Collection");
        if let Some(collection_type) = collection_type {
            grid.set_attribute("CollectionType", collection_type);
        }
        grid
    }

    /// one uniform grid: topology, geometry, and (appended by the caller)
    /// fields
    fn generate_space_grid<'a>(
        element: &'a mut XmlElement,
        topology_description: &TopologyDescription,
        geometry_description: &FieldDescription,
        name: &str,
    ) -> Result<&'a mut XmlElement, BuildError> {
        let grid = element.child(GRID);
        grid.set_attribute("Name", name);
        grid.set_attribute("GridType", "Uniform");

        {
            let topology = grid.child("Topology");
            topology.set_attribute(
                "TopologyType",
                cell_type(
                    topology_description.dimension,
                    topology_description.number_corners,
                )?,
            );

            if let Some(nodes) = nodes_per_element(
                topology_description.dimension,
                topology_description.number_corners,
            ) {
                let value = if nodes < 0 {
                    topology_description.number
                } else {
                    nodes as usize
                };
                topology.set_attribute("NodesPerElement", &value.to_string());
            }

            // point clouds carry no connectivity
            if topology_description.number_corners > 0 {
                topology.set_attribute(
                    "NumberOfElements",
                    &topology_description.number.to_string(),
                );
                Self::write_cells(topology, topology_description);
            }
        }

        let geometry = grid.child("Geometry");
        geometry.set_attribute(
            "GeometryType",
            if geometry_description.dimension() > 2 {
                "XYZ"
            } else {
                "XY"
            },
        );
        Self::write_data(geometry, geometry_description);

        Ok(grid)
    }

    /// connectivity data reference
    fn write_cells(element: &mut XmlElement, topology: &TopologyDescription) {
        let data_item = element.child(DATA_ITEM);
        data_item.set_attribute("Name", &hdf5_path_to_name(&topology.location.path));
        data_item.set_attribute("ItemType", "Uniform");
        data_item.set_attribute("Format", "HDF");
        data_item.set_attribute("Precision", "8");
        data_item.set_attribute("NumberType", "Float");
        data_item.set_attribute(
            "Dimensions",
            &format!("{} {}", topology.number, topology.number_corners),
        );
        data_item.set_text(&format!(
            "{}:{}",
            topology.location.file, topology.location.path
        ));
    }

    /// Data reference for one field.
    ///
    /// Time sliced fields select one time slice and one component window out
    /// of the packed `(time, sample, component)` array through a HyperSlab;
    /// everything else references its dataset directly.
    fn write_data(element: &mut XmlElement, field: &FieldDescription) {
        if field.has_time_dimension {
            let data_item = element.child(DATA_ITEM);
            data_item.set_attribute("ItemType", "HyperSlab");
            data_item.set_attribute(
                "Dimensions",
                &format!("1 {} {}", field.dof(), field.dimension()),
            );
            data_item.set_attribute("Type", "HyperSlab");

            {
                let selection = data_item.child(DATA_ITEM);
                selection.set_attribute("Dimensions", "3 3");
                selection.set_attribute("Format", "XML");
                // start, stride, size
                selection.set_text(&format!(
                    "{} 0 {} 1 1 {} 1 {} {}",
                    field.time_offset,
                    field.component_offset,
                    field.component_stride,
                    field.dof(),
                    field.dimension()
                ));
            }

            let source = data_item.child(DATA_ITEM);
            source.set_attribute("DataType", "Float");
            source.set_attribute("Dimensions", &join_counts(&field.shape));
            source.set_attribute("Format", "HDF");
            source.set_attribute("Precision", "8");
            source.set_text(&format!("{}:{}", field.location.file, field.location.path));
        } else {
            let data_item = element.child(DATA_ITEM);
            data_item.set_attribute("Name", &hdf5_path_to_name(&field.location.path));
            data_item.set_attribute("DataType", "Float");
            data_item.set_attribute("Dimensions", &join_counts(&field.shape));
            data_item.set_attribute("Format", "HDF");
            data_item.set_attribute("Precision", "8");
            data_item.set_text(&format!("{}:{}", field.location.file, field.location.path));
        }
    }

    /// one field attribute with its data reference
    fn write_field(element: &mut XmlElement, field: &FieldDescription) {
        let attribute = element.child("Attribute");
        attribute.set_attribute("Name", &field.name);
        attribute.set_attribute("Type", type_name(field.field_type));
        attribute.set_attribute("Center", center_name(field.field_location));

        Self::write_data(attribute, field);
    }
}
