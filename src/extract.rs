//! # Extraction
//!
//! Walks a hierarchical PETSc output tree and normalizes it into a
//! [`Specification`]. PETSc writes with a handful of fixed conventions:
//!
//! - `geometry/vertices` (optionally nested under a `viz` group) holds node
//!   coordinates;
//! - numbered `topology` groups (`topology`, `topology1`, ...) each hold a
//!   `cells` connectivity dataset with a `cell_dim` attribute, and `hcells`
//!   when a `hybrid_topology` marker group exists;
//! - `vertex_fields` / `cell_fields` (with the same numbered postfix) and
//!   `particle_fields` hold the solution datasets, typed by their
//!   `vector_field_type` or `Nc` attributes;
//! - a `time` dataset stacks the stored time values, and datasets flagged
//!   with a positive `timestepping` attribute pack all time steps into one
//!   array addressed per-slice downstream.
//!
//! Classification is strict: a dataset with neither recognized type
//! attribute aborts the extraction.

use derive_more::{Constructor, Display, From};

use crate::source::{SourceError, SourceNode};
use crate::specification::{
    FieldDescription, FieldLocation, FieldType, GridCollectionDescription, GridDescription,
    Location, Specification, TopologyDescription,
};

/// errors detected while normalizing the source tree
#[derive(Debug, thiserror::Error, From)]
pub enum ExtractError {
    #[error("{0}")]
    UnknownFieldType(UnknownFieldType),
    #[error("cannot determine geometry for particles")]
    MissingParticleGeometry,
    #[error("{0}")]
    Source(SourceError),
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "cannot determine field type for dataset `{name}`")]
pub struct UnknownFieldType {
    name: String,
}

fn field_type_from_name(value: &str) -> Option<FieldType> {
    match value {
        "scalar" => Some(FieldType::Scalar),
        "vector" => Some(FieldType::Vector),
        "tensor" => Some(FieldType::Tensor),
        "matrix" => Some(FieldType::Matrix),
        _ => None,
    }
}

fn field_type_from_components(components: i64) -> Option<FieldType> {
    match components {
        1 => Some(FieldType::Scalar),
        2 | 3 => Some(FieldType::Vector),
        _ => None,
    }
}

/// PETSc files may nest the visualization groups one level under `viz`;
/// prefer that location, fall back to the root
fn find_petsc_child<'a, N: SourceNode>(root: &'a N, name: &str) -> Option<&'a N> {
    if let Some(viz) = root.get("viz") {
        if let Some(child) = viz.get(name) {
            return Some(child);
        }
    }
    root.get(name)
}

/// postfix of the numbered topology / field group convention: empty for the
/// first index, the index itself afterwards
fn topology_postfix(index: usize) -> String {
    if index == 0 {
        String::new()
    } else {
        index.to_string()
    }
}

/// stored time values, or the single `-1` sentinel meaning "no time axis"
fn time_values<N: SourceNode>(object: &N) -> Result<Vec<f64>, SourceError> {
    match object.get("time") {
        Some(time) => time.raw_data(),
        None => Ok(vec![-1.0]),
    }
}

/// describe a coordinates dataset as a node centered vector field
fn geometry_field<N: SourceNode>(vertices: &N, file_name: &str) -> FieldDescription {
    let shape = vertices.shape();
    let component_dimension = if shape.len() > 2 {
        shape[2]
    } else {
        shape.last().copied().unwrap_or(0)
    };

    FieldDescription {
        name: vertices.name().to_string(),
        location: Location {
            file: file_name.to_string(),
            path: vertices.path().to_string(),
        },
        shape,
        component_dimension,
        field_location: FieldLocation::Node,
        field_type: FieldType::Vector,
        ..FieldDescription::default()
    }
}

/// Classify every dataset in `datasets` and append the resulting field
/// descriptions.
///
/// Packed multi-component datasets (an `Nc` outside 1..=3, or a scalar
/// stored with an explicit component axis) are split into one scalar view
/// per component, each addressing its own offset/stride window of the
/// shared storage.
pub(crate) fn classify_petsc_fields<N: SourceNode>(
    fields: &mut Vec<FieldDescription>,
    datasets: &[&N],
    location: FieldLocation,
    file_name: &str,
    time_offset: usize,
) -> Result<(), ExtractError> {
    for dataset in datasets {
        let has_time_dimension = dataset.has_attribute("timestepping")
            && dataset.attribute_integer("timestepping")? > 0;

        let mut description = FieldDescription {
            name: dataset.name().to_string(),
            location: Location {
                file: file_name.to_string(),
                path: dataset.path().to_string(),
            },
            shape: dataset.shape(),
            time_offset,
            component_offset: 0,
            component_stride: 1,
            component_dimension: 0,
            field_location: location,
            field_type: FieldType::None,
            has_time_dimension,
        };

        let mut separate_into_components = false;

        if dataset.has_attribute("vector_field_type") {
            // a mesh based field
            let vector_field_type = dataset.attribute_string("vector_field_type")?;
            if let Some(field_type) = field_type_from_name(&vector_field_type) {
                description.field_type = field_type;

                // 1-D scalars can end up declared as cell vectors after mesh
                // dimensionality reduction; the trivial component axis is
                // dropped upstream
                if description.field_type == FieldType::Vector
                    && location == FieldLocation::Cell
                    && ((description.has_time_dimension && description.shape.len() < 3)
                        || (!description.has_time_dimension && description.shape.len() < 2))
                {
                    description.field_type = FieldType::Scalar;
                }
            }
        } else if dataset.has_attribute("Nc") {
            // a particle field
            let components = dataset.attribute_integer("Nc")?;
            if let Some(field_type) = field_type_from_components(components) {
                description.field_type = field_type;
            } else if components != 0 {
                // a packed multi-field dataset, separated below
                description.field_type = FieldType::Vector;
                separate_into_components = true;
            }
        } else {
            return Err(UnknownFieldType::new(description.name).into());
        }

        if description.field_type == FieldType::Scalar {
            if description.shape.len() < 3 {
                // the unit component axis is left off for scalars upstream
                description.shape.push(1);
            } else {
                // a single object holding several packed scalars
                separate_into_components = true;
            }
        }

        description.component_dimension = if description.shape.len() > 2 {
            description.shape[2]
        } else {
            description.shape.get(1).copied().unwrap_or(0)
        };

        if description.field_type == FieldType::None {
            // unrecognized vector_field_type or Nc == 0
            continue;
        }

        if separate_into_components {
            let stride = description.dimension();
            for component in 0..stride {
                // components may carry their own names in the file
                let attribute_name = format!("componentName{}", component);
                let component_name = if dataset.has_attribute(&attribute_name) {
                    format!(
                        "{}_{}",
                        description.name,
                        dataset.attribute_string(&attribute_name)?
                    )
                } else {
                    format!("{}{}", description.name, component)
                };

                fields.push(FieldDescription {
                    name: component_name,
                    location: description.location.clone(),
                    shape: description.shape.clone(),
                    time_offset: description.time_offset,
                    component_offset: component,
                    component_stride: stride,
                    component_dimension: 1,
                    field_location: description.field_location,
                    field_type: FieldType::Scalar,
                    has_time_dimension: description.has_time_dimension,
                });
            }
        } else {
            fields.push(description);
        }
    }

    Ok(())
}

/// one mesh snapshot: geometry, primary (and possibly hybrid) topology, and
/// the classified vertex / cell fields
fn mesh_grid<N: SourceNode>(
    root: &N,
    geometry_object: &N,
    topology_object: &N,
    file_name: &str,
    time_value: f64,
    field_postfix: &str,
    field_time_offset: usize,
) -> Result<GridDescription, ExtractError> {
    let mut grid = GridDescription {
        time: time_value,
        ..GridDescription::default()
    };

    grid.geometry = geometry_field(geometry_object.require("vertices")?, file_name);

    let cells = topology_object.require("cells")?;
    let cell_shape = cells.shape();
    grid.topology = TopologyDescription {
        location: Location {
            file: file_name.to_string(),
            path: cells.path().to_string(),
        },
        number: cell_shape.first().copied().unwrap_or(0),
        number_corners: cell_shape.get(1).copied().unwrap_or(0),
        dimension: cells.attribute_integer("cell_dim")? as usize,
    };

    if find_petsc_child(root, "hybrid_topology").is_some() {
        let hybrid_cells = topology_object.require("hcells")?;
        let hybrid_shape = hybrid_cells.shape();
        grid.hybrid_topology = TopologyDescription {
            location: Location {
                file: file_name.to_string(),
                path: hybrid_cells.path().to_string(),
            },
            number: hybrid_shape.first().copied().unwrap_or(0),
            number_corners: hybrid_shape.get(1).copied().unwrap_or(0),
            // hybrid cells share the mesh dimension
            dimension: grid.topology.dimension,
        };
    }

    if let Some(vertex_fields) = root.get(&format!("vertex_fields{}", field_postfix)) {
        classify_petsc_fields(
            &mut grid.fields,
            &vertex_fields.items(),
            FieldLocation::Node,
            file_name,
            field_time_offset,
        )?;
    }
    if let Some(cell_fields) = root.get(&format!("cell_fields{}", field_postfix)) {
        classify_petsc_fields(
            &mut grid.fields,
            &cell_fields.items(),
            FieldLocation::Cell,
            file_name,
            field_time_offset,
        )?;
    }

    Ok(grid)
}

/// one particle cloud snapshot: classified particle fields, geometry from
/// `particles/coordinates` or promoted from the swarm coordinate field, and
/// a synthesized point cloud topology
fn particle_grid<N: SourceNode>(
    root: &N,
    file_name: &str,
    time_value: f64,
    field_time_offset: usize,
) -> Result<GridDescription, ExtractError> {
    let mut grid = GridDescription {
        time: time_value,
        ..GridDescription::default()
    };

    if let Some(particle_fields) = root.get("particle_fields") {
        classify_petsc_fields(
            &mut grid.fields,
            &particle_fields.items(),
            FieldLocation::Node,
            file_name,
            field_time_offset,
        )?;
    }

    if let Some(particles) = root.get("particles") {
        grid.geometry = geometry_field(particles.require("coordinates")?, file_name);
    } else {
        // no explicit coordinates: promote the swarm coordinate field out of
        // the field list
        let geometry = grid
            .fields
            .iter()
            .find(|field| field.name == "DMSwarmPIC_coor")
            .cloned()
            .ok_or(ExtractError::MissingParticleGeometry)?;
        grid.fields.retain(|field| field.name != "DMSwarmPIC_coor");
        grid.geometry = geometry;
    }

    grid.topology = TopologyDescription {
        location: Location {
            file: file_name.to_string(),
            path: String::new(),
        },
        number: grid.geometry.dof(),
        number_corners: 0,
        dimension: grid.geometry.dimension(),
    };

    Ok(grid)
}

fn shared_collection(specification: &mut Specification) -> &mut GridCollectionDescription {
    if specification.grids_collections.is_empty() {
        specification
            .grids_collections
            .push(GridCollectionDescription::default());
    }
    // the collection was just created if it did not exist
    specification.grids_collections.last_mut().unwrap()
}

impl Specification {
    /// Extract a specification from a single source object holding the whole
    /// run (possibly with packed time series datasets).
    pub fn from_petsc<N: SourceNode>(root: &N) -> Result<Specification, ExtractError> {
        let file_name = root.name().to_string();
        let mut specification = Specification::default();

        // a root geometry group marks a real mesh (FE / FV)
        if let Some(geometry_object) = find_petsc_child(root, "geometry") {
            let mut main_grid = GridCollectionDescription::default();

            // march over each possible topology
            let mut topology_index = 0;
            while let Some(topology_object) =
                find_petsc_child(root, &format!("topology{}", topology_postfix(topology_index)))
            {
                let postfix = topology_postfix(topology_index);
                let time = time_values(root)?;

                for (time_index, time_value) in time.iter().enumerate() {
                    let grid = mesh_grid(
                        root,
                        geometry_object,
                        topology_object,
                        &file_name,
                        *time_value,
                        &postfix,
                        time_index,
                    )?;
                    main_grid.grids.entry(time_index).or_default().push(grid);
                }

                topology_index += 1;
            }

            specification.grids_collections.push(main_grid);
        }

        if root.contains("particles") || root.contains("particle_fields") {
            let mut particle_collection = GridCollectionDescription {
                name: String::from("particle_domain"),
                ..GridCollectionDescription::default()
            };

            let time = time_values(root)?;
            for (time_index, time_value) in time.iter().enumerate() {
                let grid = particle_grid(root, &file_name, *time_value, time_index)?;
                particle_collection
                    .grids
                    .entry(time_index)
                    .or_default()
                    .push(grid);
            }

            specification.grids_collections.push(particle_collection);
        }

        Ok(specification)
    }

    /// Extract a specification from a sequence of source objects, one per
    /// time step.
    ///
    /// The producer is pulled until it yields `None`; the call counter is
    /// the time index, and any per-object `time` dataset contributes only
    /// its first value. All grids accumulate into a single shared
    /// collection.
    pub fn from_petsc_series<N, F>(mut producer: F) -> Result<Specification, ExtractError>
    where
        N: SourceNode,
        F: FnMut() -> Result<Option<N>, SourceError>,
    {
        let mut specification = Specification::default();
        let mut time_index_count = 0;

        while let Some(object) = producer()? {
            let file_name = object.name().to_string();

            if let Some(geometry_object) = find_petsc_child(&object, "geometry") {
                let mut topology_index = 0;
                while let Some(topology_object) = find_petsc_child(
                    &object,
                    &format!("topology{}", topology_postfix(topology_index)),
                ) {
                    let time = time_values(&object)?;
                    // fields in the series form are not packed, no postfix or
                    // time offset applies
                    let grid = mesh_grid(
                        &object,
                        geometry_object,
                        topology_object,
                        &file_name,
                        time.first().copied().unwrap_or(-1.0),
                        "",
                        0,
                    )?;

                    shared_collection(&mut specification)
                        .grids
                        .entry(time_index_count)
                        .or_default()
                        .push(grid);

                    topology_index += 1;
                }
            }

            if object.contains("particles") || object.contains("particle_fields") {
                let collection = shared_collection(&mut specification);
                collection.name = String::from("particle_domain");

                let time = time_values(&object)?;
                for time_value in time {
                    let grid = particle_grid(&object, &file_name, time_value, 0)?;
                    collection
                        .grids
                        .entry(time_index_count)
                        .or_default()
                        .push(grid);
                }
            }

            time_index_count += 1;
        }

        Ok(specification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryNode;

    fn cell_dataset(name: &str, shape: Vec<usize>) -> MemoryNode {
        MemoryNode::dataset(name, shape).with_attribute("vector_field_type", "vector")
    }

    fn classify_one(
        dataset: MemoryNode,
        location: FieldLocation,
    ) -> Result<Vec<FieldDescription>, ExtractError> {
        let mut fields = Vec::new();
        classify_petsc_fields(&mut fields, &[&dataset], location, "flow.hdf5", 0)?;
        Ok(fields)
    }

    #[test]
    fn scalar_gains_a_unit_component_axis() {
        let dataset =
            MemoryNode::dataset("pressure", vec![10]).with_attribute("vector_field_type", "scalar");
        let fields = classify_one(dataset, FieldLocation::Node).unwrap();

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].shape, vec![10, 1]);
        assert_eq!(fields[0].dimension(), 1);
    }

    #[test]
    fn timestepping_attribute_marks_time_dimension() {
        let dataset = MemoryNode::dataset("pressure", vec![3, 10])
            .with_attribute("vector_field_type", "scalar")
            .with_attribute("timestepping", 1);
        let fields = classify_one(dataset, FieldLocation::Node).unwrap();
        assert!(fields[0].has_time_dimension);

        let dataset = MemoryNode::dataset("pressure", vec![10])
            .with_attribute("vector_field_type", "scalar")
            .with_attribute("timestepping", 0);
        let fields = classify_one(dataset, FieldLocation::Node).unwrap();
        assert!(!fields[0].has_time_dimension);
    }

    #[test]
    fn cell_vector_downgrades_at_two_axes_without_time() {
        // one axis: downgraded
        let fields = classify_one(cell_dataset("flux", vec![4]), FieldLocation::Cell).unwrap();
        assert_eq!(fields[0].field_type, FieldType::Scalar);

        // two axes: kept as a vector
        let fields = classify_one(cell_dataset("flux", vec![4, 2]), FieldLocation::Cell).unwrap();
        assert_eq!(fields[0].field_type, FieldType::Vector);
        assert_eq!(fields[0].dimension(), 2);
    }

    #[test]
    fn cell_vector_downgrades_at_three_axes_with_time() {
        // two axes with a time dimension: downgraded
        let dataset = cell_dataset("flux", vec![3, 4]).with_attribute("timestepping", 1);
        let fields = classify_one(dataset, FieldLocation::Cell).unwrap();
        assert_eq!(fields[0].field_type, FieldType::Scalar);

        // three axes with a time dimension: kept as a vector
        let dataset = cell_dataset("flux", vec![3, 4, 2]).with_attribute("timestepping", 1);
        let fields = classify_one(dataset, FieldLocation::Cell).unwrap();
        assert_eq!(fields[0].field_type, FieldType::Vector);
    }

    #[test]
    fn node_vectors_never_downgrade() {
        let fields = classify_one(cell_dataset("velocity", vec![4]), FieldLocation::Node).unwrap();
        assert_eq!(fields[0].field_type, FieldType::Vector);
    }

    #[test]
    fn wide_packed_dataset_splits_per_component() {
        let dataset = MemoryNode::dataset("state", vec![20, 5]).with_attribute("Nc", 5);
        let fields = classify_one(dataset, FieldLocation::Node).unwrap();

        assert_eq!(fields.len(), 5);
        for (component, field) in fields.iter().enumerate() {
            assert_eq!(field.name, format!("state{}", component));
            assert_eq!(field.component_offset, component);
            assert_eq!(field.component_stride, 5);
            assert_eq!(field.component_dimension, 1);
            assert_eq!(field.field_type, FieldType::Scalar);
            assert_eq!(field.shape, vec![20, 5]);
        }
    }

    #[test]
    fn split_components_take_stored_names() {
        let dataset = MemoryNode::dataset("state", vec![20, 4])
            .with_attribute("Nc", 4)
            .with_attribute("componentName0", "rho")
            .with_attribute("componentName2", "rhoE");
        let fields = classify_one(dataset, FieldLocation::Node).unwrap();

        let names: Vec<_> = fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, vec!["state_rho", "state1", "state_rhoE", "state3"]);
    }

    #[test]
    fn packed_scalar_container_splits() {
        // a scalar with an explicit component axis is a packed container
        let dataset = MemoryNode::dataset("temperature", vec![3, 10, 4])
            .with_attribute("vector_field_type", "scalar");
        let fields = classify_one(dataset, FieldLocation::Node).unwrap();

        // scalars are one wide, so a single component view is produced
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "temperature0");
        assert_eq!(fields[0].component_stride, 1);
    }

    #[test]
    fn small_component_counts_map_directly() {
        let dataset = MemoryNode::dataset("velocity", vec![20, 3]).with_attribute("Nc", 3);
        let fields = classify_one(dataset, FieldLocation::Node).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, FieldType::Vector);
        assert_eq!(fields[0].dimension(), 3);
    }

    #[test]
    fn zero_components_drops_the_dataset() {
        let dataset = MemoryNode::dataset("marker", vec![20]).with_attribute("Nc", 0);
        let fields = classify_one(dataset, FieldLocation::Node).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn unrecognized_type_name_drops_the_dataset() {
        let dataset = MemoryNode::dataset("weird", vec![20, 2])
            .with_attribute("vector_field_type", "spinor");
        let fields = classify_one(dataset, FieldLocation::Node).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn untyped_dataset_is_a_fatal_error() {
        let dataset = MemoryNode::dataset("mystery", vec![20, 2]);
        let err = classify_one(dataset, FieldLocation::Node).unwrap_err();
        assert!(matches!(err, ExtractError::UnknownFieldType(_)));
    }

    fn mesh_root() -> MemoryNode {
        MemoryNode::group("flow.hdf5")
            .with_child(
                MemoryNode::group("geometry")
                    .with_child(MemoryNode::dataset("vertices", vec![10, 3])),
            )
            .with_child(
                MemoryNode::group("topology").with_child(
                    MemoryNode::dataset("cells", vec![4, 4]).with_attribute("cell_dim", 3),
                ),
            )
    }

    #[test]
    fn mesh_without_time_uses_the_sentinel() {
        let specification = Specification::from_petsc(&mesh_root()).unwrap();

        assert_eq!(specification.grids_collections.len(), 1);
        let collection = &specification.grids_collections[0];
        assert_eq!(collection.name, "domain");
        assert_eq!(collection.grids.len(), 1);

        let grid = &collection.grids[&0][0];
        assert_eq!(grid.time, -1.0);
        assert_eq!(grid.topology.number, 4);
        assert_eq!(grid.topology.number_corners, 4);
        assert_eq!(grid.topology.dimension, 3);
        assert_eq!(grid.geometry.location.path, "/geometry/vertices");
        assert_eq!(grid.geometry.location.file, "flow.hdf5");
        assert_eq!(grid.hybrid_topology.number, 0);
    }

    #[test]
    fn geometry_is_found_under_viz() {
        let root = MemoryNode::group("flow.hdf5")
            .with_child(
                MemoryNode::group("viz")
                    .with_child(
                        MemoryNode::group("geometry")
                            .with_child(MemoryNode::dataset("vertices", vec![10, 2])),
                    )
                    .with_child(
                        MemoryNode::group("topology").with_child(
                            MemoryNode::dataset("cells", vec![6, 3]).with_attribute("cell_dim", 2),
                        ),
                    ),
            );

        let specification = Specification::from_petsc(&root).unwrap();
        let grid = &specification.grids_collections[0].grids[&0][0];
        assert_eq!(grid.geometry.location.path, "/viz/geometry/vertices");
        assert_eq!(grid.topology.number_corners, 3);
    }

    #[test]
    fn numbered_topologies_share_a_time_index() {
        let root = mesh_root().with_child(
            MemoryNode::group("topology1").with_child(
                MemoryNode::dataset("cells", vec![2, 3]).with_attribute("cell_dim", 2),
            ),
        );

        let specification = Specification::from_petsc(&root).unwrap();
        let grids = &specification.grids_collections[0].grids[&0];
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0].topology.number_corners, 4);
        assert_eq!(grids[1].topology.number_corners, 3);
    }

    #[test]
    fn time_dataset_produces_one_grid_per_step() {
        let root = mesh_root().with_child(MemoryNode::values("time", vec![0.0, 0.1, 0.2]));

        let specification = Specification::from_petsc(&root).unwrap();
        let collection = &specification.grids_collections[0];
        assert_eq!(collection.grids.len(), 3);
        assert_eq!(collection.grids[&2][0].time, 0.2);
    }

    #[test]
    fn hybrid_topology_reads_hcells_and_inherits_dimension() {
        let root = MemoryNode::group("flow.hdf5")
            .with_child(
                MemoryNode::group("geometry")
                    .with_child(MemoryNode::dataset("vertices", vec![10, 3])),
            )
            .with_child(
                MemoryNode::group("topology")
                    .with_child(
                        MemoryNode::dataset("cells", vec![4, 8]).with_attribute("cell_dim", 3),
                    )
                    .with_child(MemoryNode::dataset("hcells", vec![2, 6])),
            )
            .with_child(MemoryNode::group("hybrid_topology"));

        let specification = Specification::from_petsc(&root).unwrap();
        let grid = &specification.grids_collections[0].grids[&0][0];
        assert_eq!(grid.hybrid_topology.number, 2);
        assert_eq!(grid.hybrid_topology.number_corners, 6);
        assert_eq!(grid.hybrid_topology.dimension, 3);
        assert_eq!(grid.hybrid_topology.location.path, "/topology/hcells");
    }

    #[test]
    fn swarm_coordinates_promote_to_geometry() {
        let root = MemoryNode::group("swarm.hdf5").with_child(
            MemoryNode::group("particle_fields")
                .with_child(
                    MemoryNode::dataset("DMSwarmPIC_coor", vec![20, 2]).with_attribute("Nc", 2),
                )
                .with_child(MemoryNode::dataset("mass", vec![20]).with_attribute("Nc", 1)),
        );

        let specification = Specification::from_petsc(&root).unwrap();
        let collection = &specification.grids_collections[0];
        assert_eq!(collection.name, "particle_domain");

        let grid = &collection.grids[&0][0];
        assert_eq!(grid.geometry.name, "DMSwarmPIC_coor");
        assert_eq!(grid.fields.len(), 1);
        assert_eq!(grid.fields[0].name, "mass");

        // synthesized point cloud topology
        assert_eq!(grid.topology.number_corners, 0);
        assert_eq!(grid.topology.number, 20);
        assert_eq!(grid.topology.dimension, 2);
        assert_eq!(grid.topology.location.path, "");
    }

    #[test]
    fn particles_without_any_geometry_are_fatal() {
        let root = MemoryNode::group("swarm.hdf5").with_child(
            MemoryNode::group("particle_fields")
                .with_child(MemoryNode::dataset("mass", vec![20]).with_attribute("Nc", 1)),
        );

        let err = Specification::from_petsc(&root).unwrap_err();
        assert!(matches!(err, ExtractError::MissingParticleGeometry));
    }

    #[test]
    fn explicit_particle_coordinates_win() {
        let root = MemoryNode::group("swarm.hdf5")
            .with_child(
                MemoryNode::group("particles")
                    .with_child(MemoryNode::dataset("coordinates", vec![20, 3])),
            )
            .with_child(
                MemoryNode::group("particle_fields")
                    .with_child(MemoryNode::dataset("mass", vec![20]).with_attribute("Nc", 1)),
            );

        let specification = Specification::from_petsc(&root).unwrap();
        let grid = &specification.grids_collections[0].grids[&0][0];
        assert_eq!(grid.geometry.location.path, "/particles/coordinates");
        assert_eq!(grid.geometry.dimension(), 3);
        assert_eq!(grid.fields.len(), 1);
    }

    #[test]
    fn series_extraction_keys_by_call_counter() {
        let mut steps = vec![
            mesh_root().with_child(MemoryNode::values("time", vec![0.0])),
            mesh_root().with_child(MemoryNode::values("time", vec![0.5])),
        ]
        .into_iter();

        let specification =
            Specification::from_petsc_series(|| Ok(steps.next())).unwrap();

        assert_eq!(specification.grids_collections.len(), 1);
        let collection = &specification.grids_collections[0];
        assert_eq!(collection.grids.len(), 2);
        assert_eq!(collection.grids[&0][0].time, 0.0);
        assert_eq!(collection.grids[&1][0].time, 0.5);
    }

    #[test]
    fn empty_series_yields_an_empty_specification() {
        let specification =
            Specification::from_petsc_series::<MemoryNode, _>(|| Ok(None)).unwrap();
        assert!(specification.grids_collections.is_empty());
    }
}
