pub use hash_map_graph::HashMapGraph;
pub use hypergraph::{EdgeId, Hyperedge, HypergraphView, Vertex, UNKNOWN_VERTEX};
pub use multi_hypergraph::MultiHypergraph;
pub use mutable_graph::MutableHypergraph;

mod hash_map_graph;
mod hypergraph;
mod multi_hypergraph;
mod mutable_graph;
