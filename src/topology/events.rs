//! Topology change notifications.
//!
//! A mesh owns one [`MeshEvents`] with an optional handler per entity kind.
//! Handlers run synchronously, right after the mutation they report, and
//! their return value is ignored. Rendering and logging collaborators hook
//! in here instead of polling the mesh.
//!
//! For `Removed` the handler receives the record as it was just before the
//! erase, with the handle it had at that moment.

use crate::topology::entity::{Cell, Edge, Face, Node};
use crate::topology::handle::{CellHandle, EdgeHandle, FaceHandle, NodeHandle};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TopologyEvent {
    Added,
    Removed,
    Updated,
}

pub type OnNodeEvent = Box<dyn FnMut(&Node, NodeHandle, TopologyEvent) + Send>;
pub type OnEdgeEvent = Box<dyn FnMut(&Edge, EdgeHandle, TopologyEvent) + Send>;
pub type OnFaceEvent = Box<dyn FnMut(&Face, FaceHandle, TopologyEvent) + Send>;
pub type OnCellEvent = Box<dyn FnMut(&Cell, CellHandle, TopologyEvent) + Send>;

/// Optional per-kind handlers.
#[derive(Default)]
pub struct MeshEvents {
    on_node: Option<OnNodeEvent>,
    on_edge: Option<OnEdgeEvent>,
    on_face: Option<OnFaceEvent>,
    on_cell: Option<OnCellEvent>,
}

impl MeshEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on_node(&mut self, f: Option<OnNodeEvent>) {
        self.on_node = f;
    }

    pub fn set_on_edge(&mut self, f: Option<OnEdgeEvent>) {
        self.on_edge = f;
    }

    pub fn set_on_face(&mut self, f: Option<OnFaceEvent>) {
        self.on_face = f;
    }

    pub fn set_on_cell(&mut self, f: Option<OnCellEvent>) {
        self.on_cell = f;
    }

    pub fn is_empty(&self) -> bool {
        self.on_node.is_none()
            && self.on_edge.is_none()
            && self.on_face.is_none()
            && self.on_cell.is_none()
    }

    #[inline]
    pub(crate) fn node(&mut self, node: &Node, h: NodeHandle, ev: TopologyEvent) {
        if let Some(f) = self.on_node.as_mut() {
            f(node, h, ev);
        }
    }

    #[inline]
    pub(crate) fn edge(&mut self, edge: &Edge, h: EdgeHandle, ev: TopologyEvent) {
        if let Some(f) = self.on_edge.as_mut() {
            f(edge, h, ev);
        }
    }

    #[inline]
    pub(crate) fn face(&mut self, face: &Face, h: FaceHandle, ev: TopologyEvent) {
        if let Some(f) = self.on_face.as_mut() {
            f(face, h, ev);
        }
    }

    #[inline]
    pub(crate) fn cell(&mut self, cell: &Cell, h: CellHandle, ev: TopologyEvent) {
        if let Some(f) = self.on_cell.as_mut() {
            f(cell, h, ev);
        }
    }
}

impl fmt::Debug for MeshEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshEvents")
            .field("on_node", &self.on_node.is_some())
            .field("on_edge", &self.on_edge.is_some())
            .field("on_face", &self.on_face.is_some())
            .field("on_cell", &self.on_cell.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn handlers_fire_only_when_installed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut events = MeshEvents::new();
        assert!(events.is_empty());

        let edge = Edge::new(NodeHandle::new(0), NodeHandle::new(1));
        events.edge(&edge, EdgeHandle::new(0), TopologyEvent::Added);

        events.set_on_edge(Some(Box::new(move |_: &Edge, h: EdgeHandle, ev: TopologyEvent| {
            sink.lock().unwrap().push((h, ev));
        })));
        events.edge(&edge, EdgeHandle::new(3), TopologyEvent::Removed);
        events.node(&Node::default(), NodeHandle::new(0), TopologyEvent::Added);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(EdgeHandle::new(3), TopologyEvent::Removed)]
        );
        assert_eq!(
            format!("{events:?}"),
            "MeshEvents { on_node: false, on_edge: true, on_face: false, on_cell: false }"
        );
    }
}
