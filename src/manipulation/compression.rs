use crate::error::Result;
use crate::graph::HypergraphView;
use crate::labeling::{label_nodes, LabelingFunction};
use crate::manipulation::ManipulationOperation;
use crate::tree_decomposition::TreeDecomposition;

/// Removes nodes whose bag is a subset of a neighboring bag.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompressionOperation;

impl ManipulationOperation for CompressionOperation {
    fn name(&self) -> &'static str {
        "compression"
    }

    fn apply(
        &self,
        graph: &dyn HypergraphView,
        decomposition: &mut TreeDecomposition,
        labeling_functions: &[Box<dyn LabelingFunction>],
    ) -> Result<()> {
        let grown = decomposition.flatten()?;
        label_nodes(graph, decomposition, labeling_functions, &grown)
    }
}
