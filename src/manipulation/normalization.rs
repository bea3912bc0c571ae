use crate::error::Result;
use crate::graph::HypergraphView;
use crate::labeling::LabelingFunction;
use crate::manipulation::{
    AddEmptyLeavesOperation, AddEmptyRootOperation, AddIdenticalJoinNodeParentOperation,
    ExchangeNodeReplacementOperation, JoinNodeReplacementOperation,
    LimitMaximumForgottenVertexCountOperation, LimitMaximumIntroducedVertexCountOperation,
    ManipulationOperation,
};
use crate::tree_decomposition::TreeDecomposition;
#[cfg(feature = "log")]
use log::debug;

/// Produces a nice tree decomposition: binary joins with identical bags and
/// otherwise nodes that introduce or forget at most a single vertex.
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizationOperation {
    empty_root: bool,
    empty_leaves: bool,
    identical_join_node_parent: bool,
    treat_leaf_nodes: bool,
}

impl NormalizationOperation {
    pub fn new() -> Self {
        Self::default()
    }

    impl_setter!(self, empty_root, bool);
    impl_setter!(self, empty_leaves, bool);
    impl_setter!(self, identical_join_node_parent, bool);
    impl_setter!(self, treat_leaf_nodes, bool);

    fn steps(&self) -> Vec<Box<dyn ManipulationOperation>> {
        let mut steps: Vec<Box<dyn ManipulationOperation>> = vec![Box::new(JoinNodeReplacementOperation)];
        if self.empty_root {
            steps.push(Box::new(AddEmptyRootOperation));
        }
        if self.empty_leaves {
            steps.push(Box::new(AddEmptyLeavesOperation));
        }
        steps.push(Box::new(ExchangeNodeReplacementOperation));
        steps.push(Box::new(LimitMaximumForgottenVertexCountOperation::new(1)));
        steps.push(Box::new(
            LimitMaximumIntroducedVertexCountOperation::new(1).treat_leaf_nodes(self.treat_leaf_nodes),
        ));
        if self.identical_join_node_parent {
            steps.push(Box::new(AddIdenticalJoinNodeParentOperation));
        }
        steps
    }
}

impl ManipulationOperation for NormalizationOperation {
    fn name(&self) -> &'static str {
        "normalization"
    }

    fn apply(
        &self,
        graph: &dyn HypergraphView,
        decomposition: &mut TreeDecomposition,
        labeling_functions: &[Box<dyn LabelingFunction>],
    ) -> Result<()> {
        for step in self.steps() {
            #[cfg(feature = "log")]
            debug!("normalization step {}", step.name());
            step.apply(graph, decomposition, labeling_functions)?;
        }
        Ok(())
    }
}
