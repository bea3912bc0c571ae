use crate::bucket_elimination::{finish, BucketEliminationTreeDecompositionAlgorithm, TreeDecompositionAlgorithm};
use crate::cancellation::CancellationToken;
use crate::error::Result;
use crate::graph::{HypergraphView, Vertex};
use crate::labeling::LabelingFunction;
use crate::manipulation::ManipulationOperation;
use crate::tree_decomposition::{Decomposition, NodeId, TreeDecomposition};
use crate::util::sorted_set;
use fxhash::{FxHashMap, FxHashSet};
#[cfg(feature = "log")]
use log::info;

/// Path decompositions obtained by linearizing a tree decomposition.
///
/// The nodes of the tree decomposition are listed in pre-order and every
/// vertex is stretched over the interval between its first and last
/// occurrence. Bag `i` of the path holds all vertices whose interval contains
/// `i`, so every node of the result has at most one child.
pub struct PathDecompositionAlgorithm {
    algorithm: Box<dyn TreeDecompositionAlgorithm>,
    labeling_functions: Vec<Box<dyn LabelingFunction>>,
}

impl Default for PathDecompositionAlgorithm {
    fn default() -> Self {
        Self::new(Box::new(BucketEliminationTreeDecompositionAlgorithm::default()))
    }
}

impl PathDecompositionAlgorithm {
    pub fn new(algorithm: Box<dyn TreeDecompositionAlgorithm>) -> Self {
        Self {
            algorithm,
            labeling_functions: Vec::new(),
        }
    }

    impl_setter!(self, labeling_functions, Vec<Box<dyn LabelingFunction>>);
}

impl TreeDecompositionAlgorithm for PathDecompositionAlgorithm {
    fn compute_decomposition(
        &self,
        graph: &dyn HypergraphView,
        operations: &[Box<dyn ManipulationOperation>],
        token: &CancellationToken,
    ) -> Result<Option<TreeDecomposition>> {
        let td = match self.algorithm.compute_decomposition(graph, &[], token)? {
            Some(td) => td,
            None => return Ok(None),
        };
        let mut path = linearize(&td)?;
        path.flatten()?;
        #[cfg(feature = "log")]
        info!(
            "path decomposition of width {} from tree decomposition of width {}",
            path.width(),
            td.width()
        );
        finish(graph, path, operations, &self.labeling_functions, token)
    }
}

fn linearize(td: &TreeDecomposition) -> Result<TreeDecomposition> {
    let order: Vec<NodeId> = td.dfs().collect();
    let mut first: FxHashMap<Vertex, usize> = FxHashMap::default();
    let mut last: FxHashMap<Vertex, usize> = FxHashMap::default();
    for (i, node) in order.iter().enumerate() {
        for v in td.bag_content(*node).iter().copied() {
            first.entry(v).or_insert(i);
            last.insert(v, i);
        }
    }

    let mut starts: Vec<Vec<Vertex>> = vec![Vec::new(); order.len()];
    let mut ends: Vec<Vec<Vertex>> = vec![Vec::new(); order.len()];
    for (v, i) in first.iter() {
        starts[*i].push(*v);
    }
    for (v, i) in last.iter() {
        ends[*i].push(*v);
    }

    let mut path = TreeDecomposition::new();
    let mut active: FxHashSet<Vertex> = FxHashSet::default();
    let mut current = None;
    for i in 0..order.len() {
        active.extend(starts[i].iter().copied());
        let bag = sorted_set(active.iter().copied());
        current = Some(match current {
            None => path.add_root(bag),
            Some(parent) => path.add_child(parent, bag)?,
        });
        for v in ends[i].iter() {
            active.remove(v);
        }
    }
    Ok(path)
}
