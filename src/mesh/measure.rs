//! Node positions and the measures derived from them.

use super::VolMesh;
use crate::debug_invariants::DebugInvariants;
use crate::geometry::metrics::{MeshStats, point_segment_distance, signed_volume, tet_aspect_ratio};
use crate::geometry::{Aabb, add, norm, sub};
use crate::mesh_error::{Result, VolMeshError};
use crate::topology::cache::InvalidateCache;
use crate::topology::events::TopologyEvent;
use crate::topology::handle::{CellHandle, EdgeHandle, NodeHandle};

impl VolMesh {
    /// Bounding box of the current node positions; `None` for a mesh
    /// without nodes. Cached until the next position change.
    pub fn compute_aabb(&self) -> Option<Aabb> {
        *self
            .aabb
            .get_or_init(|| Aabb::from_points(self.nodes.iter().map(|n| &n.pos)))
    }

    /// Adds `delta[3 * i..3 * i + 3]` to the position of node `i`.
    pub fn displace(&mut self, delta: &[f64]) -> Result<()> {
        if delta.len() != 3 * self.nodes.len() {
            return Err(VolMeshError::degenerate(format!(
                "displacement has {} values for {} nodes",
                delta.len(),
                self.nodes.len()
            )));
        }
        for (i, d) in delta.chunks_exact(3).enumerate() {
            let node = &mut self.nodes[i];
            node.pos = add(node.pos, [d[0], d[1], d[2]]);
            self.events
                .node(&self.nodes[i], NodeHandle::from_usize(i), TopologyEvent::Updated);
        }
        self.invalidate_cache();
        crate::debug_invariants!(self.validate_invariants(), "displace");
        Ok(())
    }

    /// Moves node `n` to `pos`; the rest position is kept.
    pub fn set_node_position(&mut self, n: NodeHandle, pos: [f64; 3]) -> Result<()> {
        self.check_node(n)?;
        self.nodes[n.index()].pos = pos;
        self.events.node(&self.nodes[n.index()], n, TopologyEvent::Updated);
        self.invalidate_cache();
        Ok(())
    }

    /// Current positions of the four nodes of `c`.
    pub fn cell_positions(&self, c: CellHandle) -> Result<[[f64; 3]; 4]> {
        let cell = self.cell(c)?;
        Ok(cell.nodes.map(|n| self.nodes[n.index()].pos))
    }

    /// Signed volume in input node order.
    pub fn cell_signed_volume(&self, c: CellHandle) -> Result<f64> {
        let [p0, p1, p2, p3] = self.cell_positions(c)?;
        Ok(signed_volume(p0, p1, p2, p3))
    }

    pub fn cell_volume(&self, c: CellHandle) -> Result<f64> {
        Ok(self.cell_signed_volume(c)?.abs())
    }

    /// Longest over shortest edge length of cell `c`.
    pub fn cell_aspect_ratio(&self, c: CellHandle) -> Result<f64> {
        Ok(tet_aspect_ratio(&self.cell_positions(c)?))
    }

    pub fn edge_length(&self, e: EdgeHandle) -> Result<f64> {
        let edge = self.edge(e)?;
        Ok(norm(sub(
            self.nodes[edge.to.index()].pos,
            self.nodes[edge.from.index()].pos,
        )))
    }

    /// Volume, edge length and aspect ratio extremes; `None` without cells.
    pub fn mesh_stats(&self) -> Option<MeshStats> {
        if self.cells.is_empty() {
            return None;
        }
        let mut stats = MeshStats::default();
        for cell in &self.cells {
            stats.add_cell(&cell.nodes.map(|n| self.nodes[n.index()].pos));
        }
        for edge in &self.edges {
            stats.add_edge(norm(sub(
                self.nodes[edge.to.index()].pos,
                self.nodes[edge.from.index()].pos,
            )));
        }
        Some(stats)
    }

    /// The node nearest to `point` and its distance.
    pub fn closest_node(&self, point: [f64; 3]) -> Option<(NodeHandle, f64)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeHandle::from_usize(i), norm(sub(n.pos, point))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// The edge nearest to `point` and its distance.
    pub fn closest_edge(&self, point: [f64; 3]) -> Option<(EdgeHandle, f64)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let d = point_segment_distance(
                    point,
                    self.nodes[e.from.index()].pos,
                    self.nodes[e.to.index()].pos,
                );
                (EdgeHandle::from_usize(i), d)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
