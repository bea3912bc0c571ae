use crate::error::Result;
use crate::graph::HypergraphView;
use crate::labeling::{label_nodes, LabelingFunction};
use crate::manipulation::ManipulationOperation;
use crate::tree_decomposition::{Decomposition, RootedTree, TreeDecomposition};

/// Adds a root with an empty bag unless the root bag is already empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddEmptyRootOperation;

impl ManipulationOperation for AddEmptyRootOperation {
    fn name(&self) -> &'static str {
        "add-empty-root"
    }

    fn apply(
        &self,
        graph: &dyn HypergraphView,
        decomposition: &mut TreeDecomposition,
        labeling_functions: &[Box<dyn LabelingFunction>],
    ) -> Result<()> {
        match decomposition.root() {
            Some(root) if decomposition.bag_content(root).is_empty() => Ok(()),
            _ => {
                let root = decomposition.add_root(Vec::new());
                label_nodes(graph, decomposition, labeling_functions, &[root])
            }
        }
    }
}

/// Attaches an empty-bag child to every leaf with a non-empty bag.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddEmptyLeavesOperation;

impl ManipulationOperation for AddEmptyLeavesOperation {
    fn name(&self) -> &'static str {
        "add-empty-leaves"
    }

    fn apply(
        &self,
        graph: &dyn HypergraphView,
        decomposition: &mut TreeDecomposition,
        labeling_functions: &[Box<dyn LabelingFunction>],
    ) -> Result<()> {
        let mut created = Vec::new();
        for leaf in decomposition.leaves() {
            if !decomposition.bag_content(leaf).is_empty() {
                created.push(decomposition.add_child(leaf, Vec::new())?);
            }
        }
        label_nodes(graph, decomposition, labeling_functions, &created)
    }
}
