//! Edge cutting and splitting.
//!
//! [`VolMesh::cut_edge`] is the disconnecting primitive: the edge `from -> to`
//! becomes `from -> np0` plus a new edge `np1 -> to`, where `np0` and `np1`
//! are two nodes at the same point that no edge joins. Faces and cells around
//! the edge keep their handles; the faces on the edge are left open until a
//! remeshing step rebuilds them.
//!
//! [`VolMesh::split_edge`] inserts a single node and keeps both halves
//! connected through it.

use super::VolMesh;
use crate::debug_invariants::DebugInvariants;
use crate::geometry::{EPS, add, lerp, norm, scale, sub};
use crate::mesh_error::{Result, VolMeshError};
use crate::topology::entity::{Edge, Node};
use crate::topology::handle::{EdgeHandle, NodeHandle};

/// Where along an edge a cut happens, measured from its `from` node.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CutParam {
    /// Distance along the normalized direction, `0 <= d <= |to - from|`.
    Distance(f64),
    /// Parametric fraction, `0 <= t <= 1`.
    Fraction(f64),
}

impl VolMesh {
    /// The node a cut or split at `param` would insert on edge `e`.
    fn point_on_edge(&self, e: EdgeHandle, param: CutParam) -> Result<Node> {
        let edge = *self.edge(e)?;
        let a = self.nodes[edge.from.index()];
        let b = self.nodes[edge.to.index()];
        match param {
            CutParam::Fraction(t) => {
                if !(0.0..=1.0).contains(&t) {
                    return Err(VolMeshError::degenerate(format!(
                        "cut fraction {t} outside [0, 1] on edge {e}"
                    )));
                }
                Ok(Node {
                    pos: lerp(a.pos, b.pos, t),
                    rest_pos: lerp(a.rest_pos, b.rest_pos, t),
                })
            }
            CutParam::Distance(d) => {
                let dir = sub(b.pos, a.pos);
                let len = norm(dir);
                if len <= EPS {
                    return Err(VolMeshError::degenerate(format!("edge {e} has zero length")));
                }
                if !(0.0..=len).contains(&d) {
                    return Err(VolMeshError::degenerate(format!(
                        "cut distance {d} outside [0, {len}] on edge {e}"
                    )));
                }
                let rest_dir = sub(b.rest_pos, a.rest_pos);
                let rest_len = norm(rest_dir);
                let rest_pos = if rest_len <= EPS {
                    a.rest_pos
                } else {
                    add(a.rest_pos, scale(rest_dir, d / rest_len))
                };
                Ok(Node {
                    pos: add(a.pos, scale(dir, d / len)),
                    rest_pos,
                })
            }
        }
    }

    /// Cuts edge `e` at `param` and returns the two disconnected duplicates
    /// `(np0, np1)`: `np0` ends the original edge, `np1` starts the new one.
    pub fn cut_edge(&mut self, e: EdgeHandle, param: CutParam) -> Result<(NodeHandle, NodeHandle)> {
        let node = self.point_on_edge(e, param)?;
        let edge = self.edges[e.index()];

        let np0 = self.push_node(node);
        let np1 = self.push_node(node);
        self.replace_edge(e, Edge::new(edge.from, np0));
        let tail = self.push_edge(Edge::new(np1, edge.to));

        log::debug!(
            "cut edge {e} ({} -> {}) at {param:?}: nodes {np0}/{np1}, new edge {tail}",
            edge.from,
            edge.to
        );
        crate::debug_invariants!(self.validate_invariants(), "cut_edge");
        Ok((np0, np1))
    }

    /// Splits edge `e` at fraction `t` with one shared node. Returns the new
    /// node and the new edge `mid -> to`.
    pub fn split_edge(&mut self, e: EdgeHandle, t: f64) -> Result<(NodeHandle, EdgeHandle)> {
        let node = self.point_on_edge(e, CutParam::Fraction(t))?;
        let edge = self.edges[e.index()];

        let mid = self.push_node(node);
        self.replace_edge(e, Edge::new(edge.from, mid));
        let tail = self.push_edge(Edge::new(mid, edge.to));

        log::debug!("split edge {e} at t = {t}: node {mid}, new edge {tail}");
        crate::debug_invariants!(self.validate_invariants(), "split_edge");
        Ok((mid, tail))
    }
}
