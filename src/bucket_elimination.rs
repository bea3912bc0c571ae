use crate::cancellation::CancellationToken;
use crate::error::Result;
use crate::graph::{HypergraphView, Vertex};
use crate::heuristic_elimination_order::{EliminationOrder, MinFillOrdering, OrderingAlgorithm};
use crate::labeling::{label_nodes, LabelingFunction};
use crate::manipulation::ManipulationOperation;
use crate::tree_decomposition::{Decomposition, NodeId, RootedTree, TreeDecomposition};
use crate::util::union;
#[cfg(feature = "log")]
use log::info;

pub trait TreeDecompositionAlgorithm: Send {
    /// Computes a decomposition of `graph` and applies `operations` to it in
    /// order. Returns `Ok(None)` if `token` is cancelled, and an error only
    /// if an operation rejects its parameters.
    fn compute_decomposition(
        &self,
        graph: &dyn HypergraphView,
        operations: &[Box<dyn ManipulationOperation>],
        token: &CancellationToken,
    ) -> Result<Option<TreeDecomposition>>;
}

/// Tree decompositions from an elimination ordering.
pub struct BucketEliminationTreeDecompositionAlgorithm {
    ordering_algorithm: Box<dyn OrderingAlgorithm>,
    labeling_functions: Vec<Box<dyn LabelingFunction>>,
}

impl Default for BucketEliminationTreeDecompositionAlgorithm {
    fn default() -> Self {
        Self::new(Box::new(MinFillOrdering))
    }
}

impl BucketEliminationTreeDecompositionAlgorithm {
    pub fn new(ordering_algorithm: Box<dyn OrderingAlgorithm>) -> Self {
        Self {
            ordering_algorithm,
            labeling_functions: Vec::new(),
        }
    }

    impl_setter!(self, labeling_functions, Vec<Box<dyn LabelingFunction>>);

    /// Like [`TreeDecompositionAlgorithm::compute_decomposition`] but eliminates
    /// along `ordering`, which must be a permutation of the vertices.
    pub fn compute_decomposition_with_ordering(
        &self,
        graph: &dyn HypergraphView,
        ordering: &EliminationOrder,
        operations: &[Box<dyn ManipulationOperation>],
        token: &CancellationToken,
    ) -> Result<Option<TreeDecomposition>> {
        ordering.validate(graph)?;
        let td = match bucket_elimination(graph, ordering, token)? {
            Some(td) => td,
            None => return Ok(None),
        };
        #[cfg(feature = "log")]
        info!(
            "bucket elimination produced {} nodes of width {}",
            td.node_count(),
            td.width()
        );
        finish(graph, td, operations, &self.labeling_functions, token)
    }
}

impl TreeDecompositionAlgorithm for BucketEliminationTreeDecompositionAlgorithm {
    fn compute_decomposition(
        &self,
        graph: &dyn HypergraphView,
        operations: &[Box<dyn ManipulationOperation>],
        token: &CancellationToken,
    ) -> Result<Option<TreeDecomposition>> {
        let ordering = match self.ordering_algorithm.compute_ordering(graph, token) {
            Some(ordering) => ordering,
            None => return Ok(None),
        };
        #[cfg(feature = "log")]
        info!(
            "{} ordering of {} vertices computed",
            self.ordering_algorithm.name(),
            ordering.len()
        );
        self.compute_decomposition_with_ordering(graph, &ordering, operations, token)
    }
}

/// Runs `operations` in order, polling `token` in between, then labels every node.
pub(crate) fn finish(
    graph: &dyn HypergraphView,
    mut td: TreeDecomposition,
    operations: &[Box<dyn ManipulationOperation>],
    labeling_functions: &[Box<dyn LabelingFunction>],
    token: &CancellationToken,
) -> Result<Option<TreeDecomposition>> {
    for operation in operations {
        if token.is_cancelled() {
            return Ok(None);
        }
        operation.apply(graph, &mut td, labeling_functions)?;
        #[cfg(feature = "log")]
        info!("{} applied, width {}", operation.name(), td.width());
    }
    if token.is_cancelled() {
        return Ok(None);
    }
    let nodes = td.nodes();
    label_nodes(graph, &mut td, labeling_functions, &nodes)?;
    Ok(Some(td))
}

/// Bucket elimination along a valid `ordering`, followed by compression.
fn bucket_elimination(
    graph: &dyn HypergraphView,
    ordering: &EliminationOrder,
    token: &CancellationToken,
) -> Result<Option<TreeDecomposition>> {
    let n = ordering.len();
    if n == 0 {
        return Ok(Some(TreeDecomposition::with_root(Vec::new())));
    }
    let positions = ordering.positions();

    let mut buckets: Vec<Vec<Vertex>> = ordering.order().iter().map(|v| vec![*v]).collect();
    for edge in graph.hyperedges() {
        let elements = edge.sorted_elements();
        if let Some(first) = elements.iter().map(|v| positions[v]).min() {
            buckets[first] = union(&buckets[first], &elements);
        }
    }

    // bucket i only ever holds vertices at positions >= i
    let mut parent: Vec<Option<usize>> = vec![None; n];
    for i in 0..n {
        if token.is_cancelled() {
            return Ok(None);
        }
        let rest: Vec<Vertex> = buckets[i]
            .iter()
            .copied()
            .filter(|v| positions[v] != i)
            .collect();
        if let Some(j) = rest.iter().map(|v| positions[v]).min() {
            buckets[j] = union(&buckets[j], &rest);
            parent[i] = Some(j);
        }
    }

    let mut td = TreeDecomposition::new();
    let mut node_of: Vec<NodeId> = vec![0; n];
    node_of[n - 1] = td.add_root(std::mem::take(&mut buckets[n - 1]));
    for i in (0..n - 1).rev() {
        let p = parent[i].unwrap_or(n - 1);
        node_of[i] = td.add_child(node_of[p], std::mem::take(&mut buckets[i]))?;
    }
    td.flatten()?;
    Ok(Some(td))
}
