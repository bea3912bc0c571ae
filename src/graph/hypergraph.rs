use crate::util::sorted_set;

/// Vertex identifier. Valid vertices are positive; see [`UNKNOWN_VERTEX`].
pub type Vertex = usize;
pub type EdgeId = usize;

pub const UNKNOWN_VERTEX: Vertex = 0;

/// An ordered list of vertices plus a unique id. Elements may repeat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hyperedge {
    id: EdgeId,
    elements: Vec<Vertex>,
}

impl Hyperedge {
    pub fn new(id: EdgeId, elements: Vec<Vertex>) -> Self {
        Self { id, elements }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn elements(&self) -> &[Vertex] {
        &self.elements
    }

    /// The distinct elements of the edge in ascending order.
    pub fn sorted_elements(&self) -> Vec<Vertex> {
        sorted_set(self.elements.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.elements.contains(&v)
    }

    pub(crate) fn retain(&mut self, v: Vertex) {
        self.elements.retain(|x| *x != v);
    }
}

/// Read-only view of a (multi-)hypergraph.
///
/// Query methods expect their vertex arguments to exist and panic otherwise.
pub trait HypergraphView {
    fn vertex_count(&self) -> usize;

    /// All vertices in ascending order.
    fn vertices(&self) -> Box<dyn Iterator<Item = Vertex> + '_>;

    fn is_vertex(&self, v: Vertex) -> bool;

    fn edge_count(&self) -> usize;

    /// All hyperedges in ascending id order.
    fn hyperedges(&self) -> Box<dyn Iterator<Item = &Hyperedge> + '_>;

    fn hyperedge(&self, id: EdgeId) -> Option<&Hyperedge>;

    fn incident_edges(&self, v: Vertex) -> Box<dyn Iterator<Item = &Hyperedge> + '_>;

    /// Sorted neighbors of `v`, excluding `v` itself.
    fn neighbors(&self, v: Vertex) -> Vec<Vertex> {
        let mut nb: Vec<Vertex> = self
            .incident_edges(v)
            .flat_map(|e| e.elements().iter().copied())
            .filter(|u| *u != v)
            .collect();
        nb.sort_unstable();
        nb.dedup();
        nb
    }

    fn degree(&self, v: Vertex) -> usize {
        self.neighbors(v).len()
    }

    fn is_neighbor(&self, u: Vertex, v: Vertex) -> bool {
        u != v && self.incident_edges(u).any(|e| e.contains(v))
    }

    /// Vertices without any neighbor.
    fn isolated_vertices(&self) -> Vec<Vertex> {
        self.vertices()
            .filter(|v| !self.incident_edges(*v).any(|e| e.elements().iter().any(|u| u != v)))
            .collect()
    }

    fn largest_hyperedge_size(&self) -> usize {
        self.hyperedges()
            .map(|e| e.sorted_elements().len())
            .max()
            .unwrap_or(0)
    }
}
