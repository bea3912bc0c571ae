use crate::bucket_elimination::{BucketEliminationTreeDecompositionAlgorithm, TreeDecompositionAlgorithm};
use crate::cancellation::CancellationToken;
use crate::error::Result;
use crate::graph::{EdgeId, HypergraphView, Vertex};
use crate::labeling::{label_nodes, EdgeCoverLabeling, LabelingFunction, COVERING_EDGES};
use crate::manipulation::ManipulationOperation;
use crate::tree_decomposition::{Decomposition, Label, NodeId, RootedTree, TreeDecomposition};
#[cfg(feature = "log")]
use log::info;

/// A tree decomposition whose nodes additionally carry a set of hyperedges
/// covering their bag.
#[derive(Debug, Clone)]
pub struct HypertreeDecomposition {
    decomposition: TreeDecomposition,
}

impl HypertreeDecomposition {
    /// Hyperedges covering the bag of `node`, sorted by id.
    pub fn covering_edges(&self, node: NodeId) -> &[EdgeId] {
        match self.decomposition.label(COVERING_EDGES, node) {
            Some(Label::Hyperedges(edges)) => edges.as_slice(),
            _ => &[],
        }
    }

    /// Largest number of covering edges of any node.
    pub fn hypertree_width(&self) -> usize {
        self.decomposition
            .nodes()
            .into_iter()
            .map(|n| self.covering_edges(n).len())
            .max()
            .unwrap_or(0)
    }

    pub fn tree_decomposition(&self) -> &TreeDecomposition {
        &self.decomposition
    }

    pub fn into_tree_decomposition(self) -> TreeDecomposition {
        self.decomposition
    }
}

impl RootedTree for HypertreeDecomposition {
    fn node_count(&self) -> usize {
        self.decomposition.node_count()
    }

    fn root(&self) -> Option<NodeId> {
        self.decomposition.root()
    }

    fn is_node(&self, node: NodeId) -> bool {
        self.decomposition.is_node(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.decomposition.parent(node)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.decomposition.children(node)
    }
}

impl Decomposition for HypertreeDecomposition {
    fn bag_content(&self, node: NodeId) -> &[Vertex] {
        self.decomposition.bag_content(node)
    }
}

/// Computes a tree decomposition and covers every bag greedily with hyperedges.
pub struct HypertreeDecompositionAlgorithm {
    algorithm: Box<dyn TreeDecompositionAlgorithm>,
    labeling_functions: Vec<Box<dyn LabelingFunction>>,
}

impl Default for HypertreeDecompositionAlgorithm {
    fn default() -> Self {
        Self::new(Box::new(BucketEliminationTreeDecompositionAlgorithm::default()))
    }
}

impl HypertreeDecompositionAlgorithm {
    pub fn new(algorithm: Box<dyn TreeDecompositionAlgorithm>) -> Self {
        Self {
            algorithm,
            labeling_functions: Vec::new(),
        }
    }

    impl_setter!(self, labeling_functions, Vec<Box<dyn LabelingFunction>>);

    pub fn compute_decomposition(
        &self,
        graph: &dyn HypergraphView,
        operations: &[Box<dyn ManipulationOperation>],
        token: &CancellationToken,
    ) -> Result<Option<HypertreeDecomposition>> {
        let mut decomposition = match self.algorithm.compute_decomposition(graph, operations, token)? {
            Some(td) => td,
            None => return Ok(None),
        };
        if token.is_cancelled() {
            return Ok(None);
        }
        let nodes = decomposition.nodes();
        let cover: Vec<Box<dyn LabelingFunction>> = vec![Box::new(EdgeCoverLabeling)];
        label_nodes(graph, &mut decomposition, &cover, &nodes)?;
        label_nodes(graph, &mut decomposition, &self.labeling_functions, &nodes)?;

        let htd = HypertreeDecomposition { decomposition };
        #[cfg(feature = "log")]
        info!("hypertree decomposition of width {}", htd.hypertree_width());
        Ok(Some(htd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MultiHypergraph;
    use crate::manipulation::JoinNodeReplacementOperation;
    use crate::util::{is_subset, sorted_set};

    fn assert_covered(graph: &MultiHypergraph, htd: &HypertreeDecomposition) {
        for node in htd.nodes() {
            let covered = sorted_set(
                htd.covering_edges(node)
                    .iter()
                    .flat_map(|e| graph.hyperedge(*e).unwrap().sorted_elements()),
            );
            let coverable: Vec<Vertex> = htd
                .bag_content(node)
                .iter()
                .copied()
                .filter(|v| graph.incident_edges(*v).next().is_some())
                .collect();
            assert!(is_subset(&coverable, &covered), "node {}", node);
        }
    }

    #[test]
    fn bags_are_covered() {
        let graph = MultiHypergraph::from_edges(
            7,
            vec![vec![1, 2, 3], vec![3, 4, 5], vec![5, 6, 1], vec![2, 4, 6], vec![7, 1]],
        )
        .unwrap();
        let htd = HypertreeDecompositionAlgorithm::default()
            .compute_decomposition(&graph, &[], &CancellationToken::new())
            .unwrap()
            .unwrap();
        assert!(htd.tree_decomposition().verify(&graph).is_ok());
        assert_covered(&graph, &htd);
        assert!(htd.hypertree_width() >= 1);
        assert!(htd.hypertree_width() <= htd.maximum_bag_size());
    }

    #[test]
    fn acyclic_hypergraph_has_width_one() {
        let graph = MultiHypergraph::from_edges(5, vec![vec![1, 2, 3], vec![3, 4, 5]]).unwrap();
        let htd = HypertreeDecompositionAlgorithm::default()
            .compute_decomposition(&graph, &[], &CancellationToken::new())
            .unwrap()
            .unwrap();
        assert_eq!(htd.hypertree_width(), 1);
    }

    #[test]
    fn covers_nodes_created_by_operations() {
        let graph = MultiHypergraph::from_edges(5, vec![vec![5, 1], vec![5, 2], vec![5, 3], vec![5, 4]]).unwrap();
        let operations: Vec<Box<dyn ManipulationOperation>> = vec![Box::new(JoinNodeReplacementOperation)];
        let htd = HypertreeDecompositionAlgorithm::default()
            .compute_decomposition(&graph, &operations, &CancellationToken::new())
            .unwrap()
            .unwrap();
        assert_covered(&graph, &htd);
        assert!(htd.nodes().into_iter().all(|n| !htd.covering_edges(n).is_empty()));
    }

    #[test]
    fn empty_graph() {
        let htd = HypertreeDecompositionAlgorithm::default()
            .compute_decomposition(&MultiHypergraph::new(), &[], &CancellationToken::new())
            .unwrap()
            .unwrap();
        assert_eq!(htd.hypertree_width(), 0);
        assert_eq!(htd.node_count(), 1);
    }
}
