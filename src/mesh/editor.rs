//! In-place replacement of the relations an entity refers to.
//!
//! Each setter validates the new relation, then detaches the entity from the
//! incidence rows and key map of its old relation and attaches it to the
//! new one. Counts and handles never change here.

use super::VolMesh;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::{Result, VolMeshError};
use crate::topology::entity::{COUNT_CELL_FACES, Edge, Face};
use crate::topology::events::TopologyEvent;
use crate::topology::handle::{CellHandle, EdgeHandle, EntityKind, FaceHandle, NodeHandle};
use crate::topology::keys::{EdgeKey, FaceKey};

impl VolMesh {
    /// Reconnects edge `e` to `from -> to`.
    ///
    /// Faces keep referring to `e`; their key is built from edge handles and
    /// stays valid.
    pub fn set_edge(&mut self, e: EdgeHandle, from: NodeHandle, to: NodeHandle) -> Result<()> {
        self.check_edge(e)?;
        self.check_node(from)?;
        self.check_node(to)?;
        if from == to {
            return Err(VolMeshError::degenerate(format!("edge {e} from node {from} to itself")));
        }
        if let Some(owner) = self.edge_handle(from, to) {
            if owner != e {
                return Err(VolMeshError::DuplicateEntity {
                    kind: EntityKind::Edge,
                    handle: owner.get(),
                });
            }
        }
        self.replace_edge(e, Edge::new(from, to));
        crate::debug_invariants!(self.validate_invariants(), "set_edge");
        Ok(())
    }

    /// Replaces the edge triple of face `f`. The edges must be distinct and
    /// close a triangle.
    pub fn set_face(&mut self, f: FaceHandle, edges: [EdgeHandle; 3]) -> Result<()> {
        self.check_face(f)?;
        self.check_triangle(&edges)?;
        if let Some(owner) = self.face_handle_by_edges(edges) {
            if owner != f {
                return Err(VolMeshError::DuplicateEntity {
                    kind: EntityKind::Face,
                    handle: owner.get(),
                });
            }
        }
        self.replace_face(f, Face::new(edges));
        crate::debug_invariants!(self.validate_invariants(), "set_face");
        Ok(())
    }

    /// Replaces the four faces of cell `c`.
    pub fn set_cell_faces(&mut self, c: CellHandle, faces: [FaceHandle; COUNT_CELL_FACES]) -> Result<()> {
        self.check_cell(c)?;
        for f in faces {
            self.check_face(f)?;
        }
        for i in 0..COUNT_CELL_FACES {
            if faces[i + 1..].contains(&faces[i]) {
                return Err(VolMeshError::degenerate(format!("cell {c} repeats face {}", faces[i])));
            }
        }

        let old = self.cells[c.index()].faces;
        for f in old {
            self.incidence.unlink_face_cell(f, c);
        }
        self.cells[c.index()].faces = faces;
        for f in faces {
            self.incidence.link_face_cell(f, c);
        }
        self.events.cell(&self.cells[c.index()], c, TopologyEvent::Updated);
        crate::debug_invariants!(self.validate_invariants(), "set_cell_faces");
        Ok(())
    }

    /// Detach, update, attach. The new key must be free or owned by `e`.
    pub(crate) fn replace_edge(&mut self, e: EdgeHandle, edge: Edge) {
        let old = self.edges[e.index()];
        self.incidence.unregister_edge(EdgeKey::new(old.from, old.to), e);
        self.incidence.unlink_node_edge(old.from, e);
        self.incidence.unlink_node_edge(old.to, e);

        self.edges[e.index()] = edge;
        self.incidence.link_node_edge(edge.from, e);
        self.incidence.link_node_edge(edge.to, e);
        self.incidence.register_edge(EdgeKey::new(edge.from, edge.to), e);
        self.events.edge(&self.edges[e.index()], e, TopologyEvent::Updated);
    }

    /// Detach, update, attach. The new key must be free or owned by `f`.
    pub(crate) fn replace_face(&mut self, f: FaceHandle, face: Face) {
        let old = self.faces[f.index()];
        self.incidence.unregister_face(FaceKey::new(old.edges), f);
        for e in old.edges {
            self.incidence.unlink_edge_face(e, f);
        }

        self.faces[f.index()] = face;
        for e in face.edges {
            self.incidence.link_edge_face(e, f);
        }
        self.incidence.register_face(FaceKey::new(face.edges), f);
        self.events.face(&self.faces[f.index()], f, TopologyEvent::Updated);
    }
}
