use crate::bucket_elimination::{BucketEliminationTreeDecompositionAlgorithm, TreeDecompositionAlgorithm};
use crate::cancellation::CancellationToken;
use crate::error::Result;
use crate::graph::{HashMapGraph, HypergraphView, Vertex};
use crate::tree_decomposition::{Decomposition, NodeId, RootedTree, TreeDecomposition};
use crate::util::contains;
use fxhash::FxHashMap;
#[cfg(feature = "log")]
use log::debug;

pub trait ConnectedComponentAlgorithm: Send {
    /// Components as sorted vertex lists, ordered by their smallest vertex.
    fn determine_components(&self, graph: &dyn HypergraphView) -> Vec<Vec<Vertex>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DepthFirstConnectedComponents;

impl ConnectedComponentAlgorithm for DepthFirstConnectedComponents {
    fn determine_components(&self, graph: &dyn HypergraphView) -> Vec<Vec<Vertex>> {
        HashMapGraph::from_hypergraph(graph).connected_components()
    }
}

pub trait SeparatorAlgorithm: Send {
    /// Computes a vertex set whose removal leaves components of at most half
    /// the vertices. `Ok(None)` on cancellation.
    fn compute_separator(
        &self,
        graph: &dyn HypergraphView,
        token: &CancellationToken,
    ) -> Result<Option<Vec<Vertex>>>;
}

/// Uses the bag of a centroid node of a tree decomposition as separator.
pub struct TreeDecompositionSeparator {
    algorithm: Box<dyn TreeDecompositionAlgorithm>,
}

impl Default for TreeDecompositionSeparator {
    fn default() -> Self {
        Self::new(Box::new(BucketEliminationTreeDecompositionAlgorithm::default()))
    }
}

impl TreeDecompositionSeparator {
    pub fn new(algorithm: Box<dyn TreeDecompositionAlgorithm>) -> Self {
        Self { algorithm }
    }
}

impl SeparatorAlgorithm for TreeDecompositionSeparator {
    fn compute_separator(
        &self,
        graph: &dyn HypergraphView,
        token: &CancellationToken,
    ) -> Result<Option<Vec<Vertex>>> {
        let td = match self.algorithm.compute_decomposition(graph, &[], token)? {
            Some(td) => td,
            None => return Ok(None),
        };
        let centroid = match centroid(&td, graph.vertex_count()) {
            Some(node) => node,
            None => return Ok(Some(Vec::new())),
        };
        #[cfg(feature = "log")]
        debug!(
            "separator of size {} from node {}",
            td.bag_content(centroid).len(),
            centroid
        );
        Ok(Some(td.bag_content(centroid).to_vec()))
    }
}

/// Every vertex is counted at the highest node containing it. Walks down from
/// the root into the child whose subtree counts more than half of `n`.
fn centroid(td: &TreeDecomposition, n: usize) -> Option<NodeId> {
    let root = td.root()?;
    let order = td.nodes();
    let mut weight: FxHashMap<NodeId, usize> = FxHashMap::default();
    for node in order.iter().rev().copied() {
        let parent_bag: &[Vertex] = td.parent(node).map_or(&[][..], |p| td.bag_content(p));
        let own = td
            .bag_content(node)
            .iter()
            .filter(|v| !contains(parent_bag, **v))
            .count();
        let below: usize = td.children(node).iter().map(|c| weight[c]).sum();
        weight.insert(node, own + below);
    }

    let mut current = root;
    while let Some(heavy) = td
        .children(current)
        .iter()
        .copied()
        .find(|c| 2 * weight[c] > n)
    {
        current = heavy;
    }
    Some(current)
}
