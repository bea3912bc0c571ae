use crate::error::Result;
use crate::graph::hypergraph::{EdgeId, HypergraphView, Vertex};

pub trait MutableHypergraph: HypergraphView {
    /// Allocates a fresh vertex id. Ids are never reused.
    fn add_vertex(&mut self) -> Vertex;

    fn add_vertices(&mut self, count: usize) -> Vec<Vertex> {
        (0..count).map(|_| self.add_vertex()).collect()
    }

    /// Removes `v` and strips it from every incident hyperedge. Hyperedges
    /// left without elements are removed as well.
    fn remove_vertex(&mut self, v: Vertex) -> Result<()>;

    fn add_hyperedge(&mut self, elements: Vec<Vertex>) -> Result<EdgeId>;

    fn add_edge(&mut self, u: Vertex, v: Vertex) -> Result<EdgeId> {
        self.add_hyperedge(vec![u, v])
    }

    fn remove_edge(&mut self, id: EdgeId) -> Result<()>;
}
