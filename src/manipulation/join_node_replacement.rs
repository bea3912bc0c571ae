use crate::error::Result;
use crate::graph::HypergraphView;
use crate::labeling::{label_nodes, LabelingFunction};
use crate::manipulation::ManipulationOperation;
use crate::tree_decomposition::{Decomposition, NodeId, RootedTree, TreeDecomposition};
#[cfg(feature = "log")]
use log::debug;

/// Turns every join node into a binary join whose two children carry
/// exactly the join node's bag.
#[derive(Clone, Copy, Debug, Default)]
pub struct JoinNodeReplacementOperation;

impl ManipulationOperation for JoinNodeReplacementOperation {
    fn name(&self) -> &'static str {
        "join-node-replacement"
    }

    fn apply(
        &self,
        graph: &dyn HypergraphView,
        decomposition: &mut TreeDecomposition,
        labeling_functions: &[Box<dyn LabelingFunction>],
    ) -> Result<()> {
        let mut created: Vec<NodeId> = Vec::new();
        for node in decomposition.join_nodes() {
            let bag = decomposition.bag_content(node).to_vec();
            let children = decomposition.children(node).to_vec();
            if children.len() == 2
                && children
                    .iter()
                    .all(|c| decomposition.bag_content(*c) == bag.as_slice())
            {
                continue;
            }

            for c in children {
                if decomposition.bag_content(c) != bag.as_slice() {
                    created.push(decomposition.add_parent(c, bag.clone())?);
                }
            }

            let mut current = node;
            while decomposition.children(current).len() > 2 {
                let rest = decomposition.children(current)[1..].to_vec();
                let join = decomposition.add_child(current, bag.clone())?;
                for r in rest {
                    decomposition.move_subtree(r, join)?;
                }
                created.push(join);
                current = join;
            }
        }
        #[cfg(feature = "log")]
        debug!("join node replacement created {} nodes", created.len());
        label_nodes(graph, decomposition, labeling_functions, &created)
    }
}

/// Gives every join node a parent with the same bag.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddIdenticalJoinNodeParentOperation;

impl ManipulationOperation for AddIdenticalJoinNodeParentOperation {
    fn name(&self) -> &'static str {
        "add-identical-join-node-parent"
    }

    fn apply(
        &self,
        graph: &dyn HypergraphView,
        decomposition: &mut TreeDecomposition,
        labeling_functions: &[Box<dyn LabelingFunction>],
    ) -> Result<()> {
        let mut created = Vec::new();
        for node in decomposition.join_nodes() {
            let bag = decomposition.bag_content(node).to_vec();
            let identical = decomposition
                .parent(node)
                .map_or(false, |p| decomposition.bag_content(p) == bag.as_slice());
            if !identical {
                created.push(decomposition.add_parent(node, bag)?);
            }
        }
        label_nodes(graph, decomposition, labeling_functions, &created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeling::{InducedEdgesLabeling, INDUCED_EDGES};
    use crate::manipulation::test_util::{decomposition, graph};

    #[test]
    fn binarizes_and_equalizes_join_nodes() {
        let g = graph();
        let mut td = decomposition();
        let before = td.node_count();
        JoinNodeReplacementOperation.apply(&g, &mut td, &[]).unwrap();

        assert!(td.verify(&g).is_ok());
        assert!(td.verify_binary_joins().is_ok());
        // three wrappers plus one extra join node
        assert_eq!(td.node_count(), before + 4);
        let root = td.root().unwrap();
        assert_eq!(td.children(root).len(), 2);
        assert_eq!(td.join_nodes().len(), 2);
    }

    #[test]
    fn join_node_replacement_is_idempotent() {
        let g = graph();
        let mut td = decomposition();
        JoinNodeReplacementOperation.apply(&g, &mut td, &[]).unwrap();
        let once = td.clone();
        JoinNodeReplacementOperation.apply(&g, &mut td, &[]).unwrap();
        assert_eq!(td, once);
    }

    #[test]
    fn created_nodes_are_labeled() {
        let g = graph();
        let mut td = decomposition();
        let old: Vec<NodeId> = td.nodes();
        let functions: Vec<Box<dyn LabelingFunction>> = vec![Box::new(InducedEdgesLabeling)];
        JoinNodeReplacementOperation
            .apply(&g, &mut td, &functions)
            .unwrap();
        for n in td.nodes() {
            assert_eq!(td.label(INDUCED_EDGES, n).is_some(), !old.contains(&n));
        }
    }

    #[test]
    fn identical_parents_for_join_nodes() {
        let g = graph();
        let mut td = decomposition();
        JoinNodeReplacementOperation.apply(&g, &mut td, &[]).unwrap();
        AddIdenticalJoinNodeParentOperation
            .apply(&g, &mut td, &[])
            .unwrap();
        for j in td.join_nodes() {
            let p = td.parent(j).unwrap();
            assert_eq!(td.bag_content(p), td.bag_content(j));
        }
        let once = td.clone();
        AddIdenticalJoinNodeParentOperation
            .apply(&g, &mut td, &[])
            .unwrap();
        assert_eq!(td, once);
        assert!(td.verify(&g).is_ok());
    }
}
