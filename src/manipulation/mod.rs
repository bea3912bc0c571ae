//! In-place transformations of tree decompositions.
//!
//! Every operation keeps coverage and the running intersection property
//! intact, leaves a decomposition that already satisfies its target shape
//! untouched, and labels the nodes it creates or whose bag it changes.
use crate::error::Result;
use crate::graph::HypergraphView;
use crate::labeling::LabelingFunction;
use crate::tree_decomposition::{NodeId, RootedTree, TreeDecomposition};

pub use compression::CompressionOperation;
pub use empty_nodes::{AddEmptyLeavesOperation, AddEmptyRootOperation};
pub use introduce_forget::{
    ExchangeNodeReplacementOperation, LimitMaximumForgottenVertexCountOperation,
    LimitMaximumIntroducedVertexCountOperation,
};
pub use join_node_replacement::{AddIdenticalJoinNodeParentOperation, JoinNodeReplacementOperation};
pub use normalization::NormalizationOperation;

mod compression;
mod empty_nodes;
mod introduce_forget;
mod join_node_replacement;
mod normalization;

pub trait ManipulationOperation: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(
        &self,
        graph: &dyn HypergraphView,
        decomposition: &mut TreeDecomposition,
        labeling_functions: &[Box<dyn LabelingFunction>],
    ) -> Result<()>;
}

/// All (parent, child) pairs in pre-order of the parent.
pub(crate) fn tree_edges(decomposition: &TreeDecomposition) -> Vec<(NodeId, NodeId)> {
    decomposition
        .nodes()
        .into_iter()
        .flat_map(|n| {
            decomposition
                .children(n)
                .iter()
                .map(move |c| (n, *c))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_util {
    use crate::graph::MultiHypergraph;
    use crate::tree_decomposition::TreeDecomposition;

    /// Graph with edges {1,2,3}, {3,4}, {3,5}, {4,6}, {5,7}.
    pub fn graph() -> MultiHypergraph {
        MultiHypergraph::from_edges(
            7,
            vec![vec![1, 2, 3], vec![3, 4], vec![3, 5], vec![4, 6], vec![5, 7]],
        )
        .unwrap()
    }

    /// A valid decomposition of [`graph`] with a three-way join at the root.
    pub fn decomposition() -> TreeDecomposition {
        let mut td = TreeDecomposition::with_root(vec![3, 4, 5]);
        let root = td.dfs().next().unwrap();
        td.add_child(root, vec![1, 2, 3]).unwrap();
        let a = td.add_child(root, vec![4, 6]).unwrap();
        td.add_child(root, vec![5, 7]).unwrap();
        td.add_child(a, vec![6]).unwrap();
        td
    }
}
