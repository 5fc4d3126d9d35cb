//! Construction of a mesh from flat vertex and element buffers.
//!
//! Each element is inserted as one cell. The signed volume of the cell picks
//! the positive or negative local masks, its six edges and four faces are
//! resolved through the key maps, and only the missing ones are created.
//! A cell is planned completely before anything is committed, so a failing
//! element leaves the mesh exactly as it was.

use super::VolMesh;
use crate::debug_invariants::DebugInvariants;
use crate::geometry::metrics::orientation_determinant;
use crate::mesh_error::{Result, VolMeshError};
use crate::topology::entity::{COUNT_CELL_EDGES, COUNT_CELL_FACES, COUNT_CELL_NODES, Cell, Edge, Face, Node};
use crate::topology::handle::{CellHandle, EdgeHandle, EntityKind, FaceHandle, NodeHandle};
use crate::topology::keys::{EdgeKey, FaceKey};
use crate::topology::validation::{ValidationOptions, validate_mesh};
use std::collections::BTreeMap;

/// Options for [`VolMesh::build_with`] and [`VolMesh::insert_cell_with`].
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Pick local masks from the sign of the cell determinant. When `false`
    /// the input winding is trusted and every cell uses the positive masks.
    pub orient_cells: bool,
    /// Reject cells whose unsigned volume is at most `flat_volume_epsilon`.
    pub reject_flat_cells: bool,
    pub flat_volume_epsilon: f64,
    /// Run the full validator once the build is complete.
    pub validate: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            orient_cells: true,
            reject_flat_cells: false,
            flat_volume_epsilon: 1e-12,
            validate: false,
        }
    }
}

/// Edges and faces a new cell resolves to, with the ones still to create.
struct CellPlan {
    cell: Cell,
    new_edges: Vec<Edge>,
    new_faces: Vec<Face>,
}

impl VolMesh {
    /// Builds a mesh from `3 * N` coordinates and `4 * M` node indices.
    pub fn build(vertices: &[f64], elements: &[u32]) -> Result<Self> {
        Self::build_with(vertices, elements, &BuildOptions::default())
    }

    pub fn build_with(vertices: &[f64], elements: &[u32], options: &BuildOptions) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(VolMeshError::degenerate(format!(
                "vertex buffer length {} is not a multiple of 3",
                vertices.len()
            )));
        }
        if elements.len() % COUNT_CELL_NODES != 0 {
            return Err(VolMeshError::degenerate(format!(
                "element buffer length {} is not a multiple of {COUNT_CELL_NODES}",
                elements.len()
            )));
        }

        let mut mesh = VolMesh::new();
        mesh.nodes.reserve(vertices.len() / 3);
        for p in vertices.chunks_exact(3) {
            mesh.push_node(Node::at([p[0], p[1], p[2]]));
        }
        for (i, element) in elements.chunks_exact(COUNT_CELL_NODES).enumerate() {
            let nodes = [
                NodeHandle::new(element[0]),
                NodeHandle::new(element[1]),
                NodeHandle::new(element[2]),
                NodeHandle::new(element[3]),
            ];
            let plan = mesh.plan_cell(nodes, options).map_err(|e| match e {
                VolMeshError::DegenerateInput(msg) => {
                    VolMeshError::degenerate(format!("element {i}: {msg}"))
                }
                VolMeshError::StructuralInconsistency(msg) => {
                    VolMeshError::structural(format!("element {i}: {msg}"))
                }
                other => other,
            })?;
            mesh.commit_cell(plan);
        }

        log::debug!("built {mesh} from {} elements", elements.len() / COUNT_CELL_NODES);
        if options.validate {
            validate_mesh(&mesh, &ValidationOptions::strict())?;
        }
        crate::debug_invariants!(mesh.validate_invariants(), "build");
        Ok(mesh)
    }

    /// Inserts one tetrahedron over existing nodes, creating only the edges
    /// and faces not already present.
    pub fn insert_cell(&mut self, nodes: [NodeHandle; COUNT_CELL_NODES]) -> Result<CellHandle> {
        self.insert_cell_with(nodes, &BuildOptions::default())
    }

    pub fn insert_cell_with(
        &mut self,
        nodes: [NodeHandle; COUNT_CELL_NODES],
        options: &BuildOptions,
    ) -> Result<CellHandle> {
        let plan = self.plan_cell(nodes, options)?;
        let h = self.commit_cell(plan);
        crate::debug_invariants!(self.validate_invariants(), "insert_cell");
        Ok(h)
    }

    /// Resolves every edge and face of the cell without mutating the mesh.
    fn plan_cell(&self, nodes: [NodeHandle; COUNT_CELL_NODES], options: &BuildOptions) -> Result<CellPlan> {
        for n in nodes {
            self.check_node(n)?;
        }
        for i in 0..COUNT_CELL_NODES {
            for j in (i + 1)..COUNT_CELL_NODES {
                if nodes[i] == nodes[j] {
                    return Err(VolMeshError::degenerate(format!("cell repeats node {}", nodes[i])));
                }
            }
        }

        let p = nodes.map(|n| self.nodes[n.index()].pos);
        let det = orientation_determinant(p[0], p[1], p[2], p[3]);
        if options.reject_flat_cells && (det / 6.0).abs() <= options.flat_volume_epsilon {
            return Err(VolMeshError::degenerate(format!(
                "flat cell over nodes {nodes:?} (volume {})",
                det / 6.0
            )));
        }
        let positive = !options.orient_cells || det >= 0.0;
        let mut cell = Cell::unresolved(nodes, positive);

        // edges: existing handle or the next free slot
        let mut planned_edges: BTreeMap<EdgeKey, EdgeHandle> = BTreeMap::new();
        let mut new_edges = Vec::new();
        for local in 0..COUNT_CELL_EDGES {
            let [a, b] = cell.local_edge_nodes(local);
            let key = EdgeKey::new(a, b);
            cell.edges[local] = match self.incidence.lookup_edge(key) {
                Some(h) => h,
                None => {
                    let h = EdgeHandle::from_usize(self.edges.len() + new_edges.len());
                    new_edges.push(Edge::new(a, b));
                    planned_edges.insert(key, h);
                    h
                }
            };
        }
        let resolve_edge = |a: NodeHandle, b: NodeHandle| -> Result<EdgeHandle> {
            let key = EdgeKey::new(a, b);
            self.incidence
                .lookup_edge(key)
                .or_else(|| planned_edges.get(&key).copied())
                .ok_or_else(|| VolMeshError::structural(format!("face edge ({a}, {b}) not found")))
        };

        // faces: three edges per mask triple, deduplicated by key
        let mut new_faces = Vec::new();
        let mut all_faces_exist = true;
        for local in 0..COUNT_CELL_FACES {
            let [a, b, c] = cell.local_face_nodes(local);
            let edges = [resolve_edge(a, b)?, resolve_edge(b, c)?, resolve_edge(c, a)?];
            cell.faces[local] = match self.incidence.lookup_face(FaceKey::new(edges)) {
                Some(h) => h,
                None => {
                    all_faces_exist = false;
                    let h = FaceHandle::from_usize(self.faces.len() + new_faces.len());
                    new_faces.push(Face::new(edges));
                    h
                }
            };
        }

        if all_faces_exist {
            let mut sorted = nodes;
            sorted.sort_unstable();
            for &other in self.incidence.cells_of_face(cell.faces[0]) {
                let mut theirs = self.cells[other.index()].nodes;
                theirs.sort_unstable();
                if theirs == sorted {
                    return Err(VolMeshError::DuplicateEntity {
                        kind: EntityKind::Cell,
                        handle: other.get(),
                    });
                }
            }
        }

        Ok(CellPlan {
            cell,
            new_edges,
            new_faces,
        })
    }

    fn commit_cell(&mut self, plan: CellPlan) -> CellHandle {
        for edge in plan.new_edges {
            self.push_edge(edge);
        }
        for face in plan.new_faces {
            self.push_face(face);
        }
        self.push_cell(plan.cell)
    }
}
