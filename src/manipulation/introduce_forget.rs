use crate::error::{Error, Result};
use crate::graph::HypergraphView;
use crate::labeling::{label_nodes, LabelingFunction};
use crate::manipulation::{tree_edges, ManipulationOperation};
use crate::tree_decomposition::{Decomposition, NodeId, RootedTree, TreeDecomposition};
use crate::util::{difference, intersection, union};

/// Splits every tree edge that both introduces and forgets vertices by
/// inserting a node with the intersection of the two bags.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExchangeNodeReplacementOperation;

impl ManipulationOperation for ExchangeNodeReplacementOperation {
    fn name(&self) -> &'static str {
        "exchange-node-replacement"
    }

    fn apply(
        &self,
        graph: &dyn HypergraphView,
        decomposition: &mut TreeDecomposition,
        labeling_functions: &[Box<dyn LabelingFunction>],
    ) -> Result<()> {
        let mut created = Vec::new();
        for (node, child) in tree_edges(decomposition) {
            let bag = decomposition.bag_content(node);
            let child_bag = decomposition.bag_content(child);
            if !difference(bag, child_bag).is_empty() && !difference(child_bag, bag).is_empty() {
                let common = intersection(bag, child_bag);
                created.push(decomposition.add_parent(child, common)?);
            }
        }
        label_nodes(graph, decomposition, labeling_functions, &created)
    }
}

/// Caps the number of vertices a node introduces.
///
/// Tree edges introducing more than `limit` vertices get a chain of
/// intermediate nodes adding `limit` vertices at a time. Join nodes
/// introducing too many vertices are split into a chain above a new join
/// node. With `treat_leaf_nodes`, leaves with more than `limit` vertices
/// get a chain of shrinking children.
#[derive(Clone, Copy, Debug)]
pub struct LimitMaximumIntroducedVertexCountOperation {
    limit: usize,
    treat_leaf_nodes: bool,
}

impl LimitMaximumIntroducedVertexCountOperation {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            treat_leaf_nodes: false,
        }
    }

    impl_setter!(self, treat_leaf_nodes, bool);
}

impl ManipulationOperation for LimitMaximumIntroducedVertexCountOperation {
    fn name(&self) -> &'static str {
        "limit-maximum-introduced-vertex-count"
    }

    fn apply(
        &self,
        graph: &dyn HypergraphView,
        decomposition: &mut TreeDecomposition,
        labeling_functions: &[Box<dyn LabelingFunction>],
    ) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::InvalidParameter("introduced vertex limit must be positive"));
        }
        let limit = self.limit;
        let mut created: Vec<NodeId> = Vec::new();

        for node in decomposition.nodes() {
            let children = decomposition.children(node).to_vec();
            match children.len() {
                0 => {
                    if !self.treat_leaf_nodes {
                        continue;
                    }
                    let mut remaining = decomposition.bag_content(node).to_vec();
                    let mut current = node;
                    while remaining.len() > limit {
                        remaining.truncate(remaining.len() - limit);
                        current = decomposition.add_child(current, remaining.clone())?;
                        created.push(current);
                    }
                }
                1 => {
                    let child = children[0];
                    let introduced = decomposition.introduced_vertices(node);
                    if introduced.len() <= limit {
                        continue;
                    }
                    let mut bag = decomposition.bag_content(child).to_vec();
                    let mut current = child;
                    let chunks: Vec<&[usize]> = introduced.chunks(limit).collect();
                    for chunk in &chunks[..chunks.len() - 1] {
                        bag = union(&bag, chunk);
                        current = decomposition.add_parent(current, bag.clone())?;
                        created.push(current);
                    }
                }
                _ => {
                    let introduced = decomposition.introduced_vertices(node);
                    if introduced.len() <= limit {
                        continue;
                    }
                    // node keeps introducing the last chunk; a new join node
                    // below it takes over the children with a smaller bag
                    let mut bag = decomposition.bag_content(node).to_vec();
                    let mut current = node;
                    let chunks: Vec<&[usize]> = introduced.chunks(limit).collect();
                    for chunk in chunks[1..].iter().rev() {
                        bag = difference(&bag, chunk);
                        let join = decomposition.add_child(current, bag.clone())?;
                        for c in decomposition.children(current).to_vec() {
                            if c != join {
                                decomposition.move_subtree(c, join)?;
                            }
                        }
                        created.push(join);
                        current = join;
                    }
                }
            }
        }
        label_nodes(graph, decomposition, labeling_functions, &created)
    }
}

/// Caps the number of vertices forgotten along a tree edge by inserting
/// intermediate nodes that drop `limit` vertices at a time.
#[derive(Clone, Copy, Debug)]
pub struct LimitMaximumForgottenVertexCountOperation {
    limit: usize,
}

impl LimitMaximumForgottenVertexCountOperation {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl ManipulationOperation for LimitMaximumForgottenVertexCountOperation {
    fn name(&self) -> &'static str {
        "limit-maximum-forgotten-vertex-count"
    }

    fn apply(
        &self,
        graph: &dyn HypergraphView,
        decomposition: &mut TreeDecomposition,
        labeling_functions: &[Box<dyn LabelingFunction>],
    ) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::InvalidParameter("forgotten vertex limit must be positive"));
        }
        let mut created = Vec::new();
        for (node, child) in tree_edges(decomposition) {
            let forgotten = difference(decomposition.bag_content(child), decomposition.bag_content(node));
            if forgotten.len() <= self.limit {
                continue;
            }
            let mut bag = decomposition.bag_content(child).to_vec();
            let mut current = child;
            let chunks: Vec<&[usize]> = forgotten.chunks(self.limit).collect();
            for chunk in &chunks[..chunks.len() - 1] {
                bag = difference(&bag, chunk);
                current = decomposition.add_parent(current, bag.clone())?;
                created.push(current);
            }
        }
        label_nodes(graph, decomposition, labeling_functions, &created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MultiHypergraph;
    use crate::manipulation::test_util::{decomposition, graph};

    fn max_introduced(td: &TreeDecomposition, leaves: bool) -> usize {
        td.nodes()
            .into_iter()
            .filter(|n| leaves || !td.is_leaf(*n))
            .map(|n| td.introduced_vertices(n).len())
            .max()
            .unwrap_or(0)
    }

    fn max_forgotten(td: &TreeDecomposition) -> usize {
        tree_edges(td)
            .into_iter()
            .map(|(n, c)| difference(td.bag_content(c), td.bag_content(n)).len())
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn exchange_nodes_are_split() {
        let g = graph();
        let mut td = decomposition();
        ExchangeNodeReplacementOperation.apply(&g, &mut td, &[]).unwrap();
        for (n, c) in tree_edges(&td) {
            let introduces = !difference(td.bag_content(n), td.bag_content(c)).is_empty();
            let forgets = !difference(td.bag_content(c), td.bag_content(n)).is_empty();
            assert!(!(introduces && forgets));
        }
        assert!(td.verify(&g).is_ok());

        let once = td.clone();
        ExchangeNodeReplacementOperation.apply(&g, &mut td, &[]).unwrap();
        assert_eq!(td, once);
    }

    #[test]
    fn forgotten_vertices_are_limited() {
        let g = MultiHypergraph::from_edges(5, vec![vec![1, 2, 3, 4, 5]]).unwrap();
        let mut td = TreeDecomposition::with_root(vec![]);
        let root = td.root().unwrap();
        td.add_child(root, vec![1, 2, 3, 4, 5]).unwrap();

        LimitMaximumForgottenVertexCountOperation::new(2)
            .apply(&g, &mut td, &[])
            .unwrap();
        assert_eq!(max_forgotten(&td), 2);
        assert_eq!(td.node_count(), 4);
        assert!(td.verify(&g).is_ok());

        let once = td.clone();
        LimitMaximumForgottenVertexCountOperation::new(2)
            .apply(&g, &mut td, &[])
            .unwrap();
        assert_eq!(td, once);
    }

    #[test]
    fn introduced_vertices_are_limited() {
        let g = MultiHypergraph::from_edges(6, vec![vec![1, 2, 3, 4, 5], vec![1, 6]]).unwrap();
        let mut td = TreeDecomposition::with_root(vec![1, 2, 3, 4, 5]);
        let root = td.root().unwrap();
        td.add_child(root, vec![1, 6]).unwrap();

        LimitMaximumIntroducedVertexCountOperation::new(1)
            .apply(&g, &mut td, &[])
            .unwrap();
        assert_eq!(max_introduced(&td, false), 1);
        assert_eq!(max_introduced(&td, true), 2);
        assert!(td.verify(&g).is_ok());

        LimitMaximumIntroducedVertexCountOperation::new(1)
            .treat_leaf_nodes(true)
            .apply(&g, &mut td, &[])
            .unwrap();
        assert_eq!(max_introduced(&td, true), 1);
        assert!(td.verify(&g).is_ok());
    }

    #[test]
    fn join_nodes_introducing_vertices_are_split() {
        let g = MultiHypergraph::from_edges(5, vec![vec![1, 2, 3, 4], vec![1, 5]]).unwrap();
        let mut td = TreeDecomposition::with_root(vec![1, 2, 3, 4]);
        let root = td.root().unwrap();
        td.add_child(root, vec![1]).unwrap();
        td.add_child(root, vec![1, 5]).unwrap();

        LimitMaximumIntroducedVertexCountOperation::new(1)
            .apply(&g, &mut td, &[])
            .unwrap();
        assert_eq!(max_introduced(&td, false), 1);
        assert_eq!(td.join_nodes().len(), 1);
        assert!(td.verify(&g).is_ok());
    }

    #[test]
    fn zero_limits_are_rejected() {
        let g = graph();
        let mut td = decomposition();
        let before = td.clone();
        assert!(LimitMaximumForgottenVertexCountOperation::new(0)
            .apply(&g, &mut td, &[])
            .is_err());
        assert!(LimitMaximumIntroducedVertexCountOperation::new(0)
            .apply(&g, &mut td, &[])
            .is_err());
        assert_eq!(td, before);
    }
}
