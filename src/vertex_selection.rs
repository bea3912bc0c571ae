use crate::graph::{HypergraphView, Vertex};
use rand::prelude::{SliceRandom, StdRng};
use rand::SeedableRng;

/// Picks candidate vertices from a graph, e.g. start vertices for a search.
///
/// Implementations return existing vertices without duplicates and have no
/// side effects.
pub trait VertexSelectionStrategy: Send + Sync {
    fn select_vertices(&self, graph: &dyn HypergraphView) -> Vec<Vertex>;
}

/// Selects every vertex in graph order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExhaustiveVertexSelection;

impl VertexSelectionStrategy for ExhaustiveVertexSelection {
    fn select_vertices(&self, graph: &dyn HypergraphView) -> Vec<Vertex> {
        graph.vertices().collect()
    }
}

/// Selects a seeded random sample of at most `count` vertices, returned in
/// graph order. The same seed always produces the same sample.
#[derive(Clone, Copy, Debug)]
pub struct RandomVertexSelection {
    count: usize,
    seed: u64,
}

impl RandomVertexSelection {
    pub fn new(count: usize, seed: u64) -> Self {
        Self { count, seed }
    }
}

impl VertexSelectionStrategy for RandomVertexSelection {
    fn select_vertices(&self, graph: &dyn HypergraphView) -> Vec<Vertex> {
        let vertices: Vec<Vertex> = graph.vertices().collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut sample: Vec<Vertex> = vertices
            .choose_multiple(&mut rng, self.count)
            .copied()
            .collect();
        sample.sort_unstable();
        sample
    }
}
