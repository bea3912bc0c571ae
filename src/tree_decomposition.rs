use crate::datastructures::BitSet;
use crate::error::{Error, Result};
use crate::graph::{EdgeId, HypergraphView, Vertex};
use crate::util::{contains, difference, intersection, is_subset, sorted_set, union};
use fxhash::FxHashMap;
use std::collections::BTreeMap;
use thiserror::Error;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeDecompositionValidationError {
    #[error("Has Cycle")]
    HasCycle,
    #[error("Not Connected")]
    NotConnected,
    #[error("Missing Vertex: {0}")]
    MissingVertex(Vertex),
    #[error("Missing Edge: {0}")]
    MissingEdge(EdgeId),
    #[error("Not Inducing Subtree: {0}")]
    NotInducingSubtree(Vertex),
    #[error("Invalid Join Node: {0}")]
    InvalidJoinNode(NodeId),
}

/// Auxiliary per-node information attached by labeling functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Vertices(Vec<Vertex>),
    Hyperedges(Vec<EdgeId>),
}

/// Structural queries of a rooted, ordered tree. Node arguments must exist.
pub trait RootedTree {
    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize {
        self.node_count().saturating_sub(1)
    }

    fn root(&self) -> Option<NodeId>;

    fn is_node(&self, node: NodeId) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> &[NodeId];

    fn is_leaf(&self, node: NodeId) -> bool {
        self.children(node).is_empty()
    }

    /// All nodes in pre-order, children visited in their stored order.
    fn nodes(&self) -> Vec<NodeId> {
        let mut result = Vec::with_capacity(self.node_count());
        let mut stack: Vec<NodeId> = self.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            result.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        result
    }

    fn leaves(&self) -> Vec<NodeId> {
        self.nodes().into_iter().filter(|n| self.is_leaf(*n)).collect()
    }
}

/// A rooted tree whose nodes carry bags of vertices.
pub trait Decomposition: RootedTree {
    /// Sorted bag of `node`.
    fn bag_content(&self, node: NodeId) -> &[Vertex];

    fn maximum_bag_size(&self) -> usize {
        self.nodes()
            .iter()
            .map(|n| self.bag_content(*n).len())
            .max()
            .unwrap_or(0)
    }

    /// Maximum bag size minus one; `0` for decompositions without vertices.
    fn width(&self) -> usize {
        self.maximum_bag_size().saturating_sub(1)
    }

    fn is_join_node(&self, node: NodeId) -> bool {
        self.children(node).len() > 1
    }

    fn join_nodes(&self) -> Vec<NodeId> {
        self.nodes()
            .into_iter()
            .filter(|n| self.is_join_node(*n))
            .collect()
    }

    /// Union of the bags of all children of `node`.
    fn child_vertices(&self, node: NodeId) -> Vec<Vertex> {
        self.children(node)
            .iter()
            .fold(Vec::new(), |acc, c| union(&acc, self.bag_content(*c)))
    }

    /// Vertices of `node` not present in any child.
    fn introduced_vertices(&self, node: NodeId) -> Vec<Vertex> {
        difference(self.bag_content(node), &self.child_vertices(node))
    }

    /// Vertices present in some child but not in `node`.
    fn forgotten_vertices(&self, node: NodeId) -> Vec<Vertex> {
        difference(&self.child_vertices(node), self.bag_content(node))
    }

    fn remembered_vertices(&self, node: NodeId) -> Vec<Vertex> {
        intersection(self.bag_content(node), &self.child_vertices(node))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Node {
    bag: Vec<Vertex>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Rooted tree decomposition with stable, never reused node ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeDecomposition {
    nodes: FxHashMap<NodeId, Node>,
    root: Option<NodeId>,
    next_node: NodeId,
    labels: BTreeMap<String, FxHashMap<NodeId, Label>>,
}

impl Default for TreeDecomposition {
    fn default() -> Self {
        Self {
            nodes: FxHashMap::default(),
            root: None,
            next_node: 1,
            labels: BTreeMap::new(),
        }
    }
}

impl RootedTree for TreeDecomposition {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn is_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    fn nodes(&self) -> Vec<NodeId> {
        self.dfs().collect()
    }
}

impl Decomposition for TreeDecomposition {
    fn bag_content(&self, node: NodeId) -> &[Vertex] {
        &self.node(node).bag
    }
}

impl TreeDecomposition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(bag: Vec<Vertex>) -> Self {
        let mut td = Self::default();
        td.add_root(bag);
        td
    }

    fn node(&self, node: NodeId) -> &Node {
        match self.nodes.get(&node) {
            Some(n) => n,
            None => panic!("{} is not a node", node),
        }
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&node).ok_or(Error::UnknownNode(node))
    }

    fn check(&self, node: NodeId) -> Result<()> {
        if self.is_node(node) {
            Ok(())
        } else {
            Err(Error::UnknownNode(node))
        }
    }

    fn allocate(&mut self, bag: Vec<Vertex>, parent: Option<NodeId>) -> NodeId {
        let id = self.next_node;
        self.next_node += 1;
        self.nodes.insert(
            id,
            Node {
                bag: sorted_set(bag),
                parent,
                children: Vec::new(),
            },
        );
        id
    }

    /// Adds a new root. The previous root, if any, becomes its only child.
    pub fn add_root(&mut self, bag: Vec<Vertex>) -> NodeId {
        let id = self.allocate(bag, None);
        if let Some(old_root) = self.root.replace(id) {
            if let Some(old) = self.nodes.get_mut(&old_root) {
                old.parent = Some(id);
            }
            if let Some(new) = self.nodes.get_mut(&id) {
                new.children.push(old_root);
            }
        }
        id
    }

    /// Appends a new child to `parent`.
    pub fn add_child(&mut self, parent: NodeId, bag: Vec<Vertex>) -> Result<NodeId> {
        self.check(parent)?;
        let id = self.allocate(bag, Some(parent));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Inserts a new node between `node` and its parent, taking `node`'s
    /// position among the siblings. For the root, the new node becomes root.
    pub fn add_parent(&mut self, node: NodeId, bag: Vec<Vertex>) -> Result<NodeId> {
        let parent = self.node_mut(node)?.parent;
        match parent {
            None => Ok(self.add_root(bag)),
            Some(parent) => {
                let id = self.allocate(bag, Some(parent));
                self.node_mut(node)?.parent = Some(id);
                self.node_mut(id)?.children.push(node);
                for c in self.node_mut(parent)?.children.iter_mut() {
                    if *c == node {
                        *c = id;
                    }
                }
                Ok(id)
            }
        }
    }

    pub fn set_bag(&mut self, node: NodeId, bag: Vec<Vertex>) -> Result<()> {
        self.node_mut(node)?.bag = sorted_set(bag);
        Ok(())
    }

    /// Removes `node`. Its children take its place below its parent; removing
    /// the root promotes the first child, which adopts the remaining children.
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        let removed = self.nodes.remove(&node).ok_or(Error::UnknownNode(node))?;
        for labels in self.labels.values_mut() {
            labels.remove(&node);
        }
        match removed.parent {
            Some(parent) => {
                for c in removed.children.iter() {
                    self.node_mut(*c)?.parent = Some(parent);
                }
                let siblings = &mut self.node_mut(parent)?.children;
                match siblings.iter().position(|c| *c == node) {
                    Some(position) => siblings
                        .splice(position..position + 1, removed.children.iter().copied())
                        .for_each(drop),
                    None => siblings.extend(removed.children.iter().copied()),
                }
            }
            None => {
                let mut children = removed.children.into_iter();
                self.root = children.next();
                if let Some(new_root) = self.root {
                    let rest: Vec<NodeId> = children.collect();
                    for c in rest.iter() {
                        self.node_mut(*c)?.parent = Some(new_root);
                    }
                    let root = self.node_mut(new_root)?;
                    root.parent = None;
                    root.children.extend(rest);
                }
            }
        }
        Ok(())
    }

    /// Reattaches the subtree rooted at `node` as the last child of `new_parent`.
    pub fn move_subtree(&mut self, node: NodeId, new_parent: NodeId) -> Result<()> {
        self.check(node)?;
        self.check(new_parent)?;
        if self.is_in_subtree(node, new_parent) {
            return Err(Error::NodeInOwnSubtree {
                node,
                target: new_parent,
            });
        }
        if let Some(old_parent) = self.node(node).parent {
            self.node_mut(old_parent)?.children.retain(|c| *c != node);
        }
        self.node_mut(node)?.parent = Some(new_parent);
        self.node_mut(new_parent)?.children.push(node);
        Ok(())
    }

    /// Whether `target` lies in the subtree rooted at `node`.
    pub fn is_in_subtree(&self, node: NodeId, target: NodeId) -> bool {
        let mut current = Some(target);
        while let Some(c) = current {
            if c == node {
                return true;
            }
            current = self.nodes.get(&c).and_then(|n| n.parent);
        }
        false
    }

    pub fn dfs(&self) -> TreeDecompositionIterator<'_> {
        TreeDecompositionIterator {
            td: self,
            stack: self.root.into_iter().collect(),
        }
    }

    pub fn set_label(&mut self, name: &str, node: NodeId, label: Label) -> Result<()> {
        self.check(node)?;
        self.labels
            .entry(name.to_string())
            .or_insert_with(FxHashMap::default)
            .insert(node, label);
        Ok(())
    }

    pub fn label(&self, name: &str, node: NodeId) -> Option<&Label> {
        self.labels.get(name).and_then(|labels| labels.get(&node))
    }

    pub fn label_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.keys().map(|k| k.as_str())
    }

    /// Merges every node whose bag is a subset of its parent's bag (or vice
    /// versa) into the parent. Returns the nodes whose bag grew.
    pub fn flatten(&mut self) -> Result<Vec<NodeId>> {
        let mut grown = Vec::new();
        loop {
            let mut changed = false;
            for node in self.nodes().into_iter().rev() {
                let parent = match self.nodes.get(&node).and_then(|n| n.parent) {
                    Some(parent) => parent,
                    None => continue,
                };
                let bag = self.bag_content(node).to_vec();
                if is_subset(&bag, self.bag_content(parent)) {
                    self.remove_node(node)?;
                    changed = true;
                } else if is_subset(self.bag_content(parent), &bag) {
                    self.set_bag(parent, bag)?;
                    self.remove_node(node)?;
                    grown.retain(|n| *n != node);
                    grown.push(parent);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        grown.sort_unstable();
        grown.dedup();
        grown.retain(|n| self.is_node(*n));
        Ok(grown)
    }

    pub fn verify(&self, graph: &dyn HypergraphView) -> std::result::Result<(), TreeDecompositionValidationError> {
        self.verify_structure()?;

        let mut tops: FxHashMap<Vertex, usize> = FxHashMap::default();
        let mut occurrences: FxHashMap<Vertex, Vec<NodeId>> = FxHashMap::default();
        for (id, node) in self.nodes.iter() {
            let parent_bag: &[Vertex] = match node.parent {
                Some(p) => &self.node(p).bag,
                None => &[],
            };
            for v in node.bag.iter().copied() {
                occurrences.entry(v).or_insert_with(Vec::new).push(*id);
                if !contains(parent_bag, v) {
                    *tops.entry(v).or_insert(0) += 1;
                }
            }
        }

        if let Some(v) = graph.vertices().find(|v| !occurrences.contains_key(v)) {
            return Err(TreeDecompositionValidationError::MissingVertex(v));
        }

        for edge in graph.hyperedges() {
            let elements = edge.sorted_elements();
            let covered = match occurrences.get(&elements[0]) {
                Some(candidates) => candidates
                    .iter()
                    .any(|n| is_subset(&elements, &self.node(*n).bag)),
                None => false,
            };
            if !covered {
                return Err(TreeDecompositionValidationError::MissingEdge(edge.id()));
            }
        }

        let mut vertices: Vec<Vertex> = tops
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(v, _)| *v)
            .collect();
        vertices.sort_unstable();
        if let Some(v) = vertices.first() {
            return Err(TreeDecompositionValidationError::NotInducingSubtree(*v));
        }
        Ok(())
    }

    /// Checks that every node with two or more children has exactly two
    /// children whose bags equal its own.
    pub fn verify_binary_joins(&self) -> std::result::Result<(), TreeDecompositionValidationError> {
        for node in self.join_nodes() {
            let bag = self.bag_content(node);
            let children = self.children(node);
            if children.len() != 2 || children.iter().any(|c| self.bag_content(*c) != bag) {
                return Err(TreeDecompositionValidationError::InvalidJoinNode(node));
            }
        }
        Ok(())
    }

    fn verify_structure(&self) -> std::result::Result<(), TreeDecompositionValidationError> {
        let root = match self.root {
            Some(root) => root,
            None if self.nodes.is_empty() => return Ok(()),
            None => return Err(TreeDecompositionValidationError::NotConnected),
        };
        if self.nodes.get(&root).map_or(true, |r| r.parent.is_some()) {
            return Err(TreeDecompositionValidationError::HasCycle);
        }
        let mut visited = BitSet::new(self.next_node);
        let mut stack = vec![root];
        visited.set_bit(root);
        while let Some(current) = stack.pop() {
            for c in self.node(current).children.iter().copied() {
                match self.nodes.get(&c) {
                    Some(child) if child.parent == Some(current) => {}
                    _ => return Err(TreeDecompositionValidationError::HasCycle),
                }
                if visited.set_bit(c) {
                    return Err(TreeDecompositionValidationError::HasCycle);
                }
                stack.push(c);
            }
        }
        if visited.cardinality() != self.nodes.len() {
            return Err(TreeDecompositionValidationError::NotConnected);
        }
        Ok(())
    }
}

pub struct TreeDecompositionIterator<'a> {
    td: &'a TreeDecomposition,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for TreeDecompositionIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Some(node) = self.td.nodes.get(&current) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MultiHypergraph;

    fn path_graph() -> MultiHypergraph {
        MultiHypergraph::from_edges(3, vec![vec![1, 2], vec![2, 3]]).unwrap()
    }

    #[test]
    fn build_and_query() {
        let mut td = TreeDecomposition::with_root(vec![2, 1]);
        let root = td.root().unwrap();
        let child = td.add_child(root, vec![3, 2]).unwrap();

        assert_eq!(td.node_count(), 2);
        assert_eq!(td.edge_count(), 1);
        assert_eq!(td.bag_content(root), &[1, 2]);
        assert_eq!(td.children(root), &[child]);
        assert_eq!(td.parent(child), Some(root));
        assert_eq!(td.width(), 1);
        assert_eq!(td.introduced_vertices(root), vec![1]);
        assert_eq!(td.forgotten_vertices(root), vec![3]);
        assert_eq!(td.remembered_vertices(root), vec![2]);
        assert!(td.verify(&path_graph()).is_ok());
    }

    #[test]
    fn unknown_nodes_are_rejected() {
        let mut td = TreeDecomposition::with_root(vec![1]);
        assert_eq!(td.add_child(42, vec![]), Err(Error::UnknownNode(42)));
        assert_eq!(td.set_bag(42, vec![]), Err(Error::UnknownNode(42)));
        assert_eq!(td.remove_node(42), Err(Error::UnknownNode(42)));
    }

    #[test]
    fn add_parent_keeps_sibling_position() {
        let mut td = TreeDecomposition::with_root(vec![1]);
        let root = td.root().unwrap();
        let a = td.add_child(root, vec![1, 2]).unwrap();
        let b = td.add_child(root, vec![1, 3]).unwrap();
        let between = td.add_parent(a, vec![1]).unwrap();
        assert_eq!(td.children(root), &[between, b]);
        assert_eq!(td.children(between), &[a]);

        let new_root = td.add_parent(root, vec![]).unwrap();
        assert_eq!(td.root(), Some(new_root));
        assert_eq!(td.parent(root), Some(new_root));
    }

    #[test]
    fn remove_node_splices_children() {
        let mut td = TreeDecomposition::with_root(vec![1, 2]);
        let root = td.root().unwrap();
        let mid = td.add_child(root, vec![2]).unwrap();
        let x = td.add_child(mid, vec![2, 3]).unwrap();
        let y = td.add_child(mid, vec![2, 4]).unwrap();
        let z = td.add_child(root, vec![1, 5]).unwrap();
        td.set_label("l", mid, Label::Vertices(vec![2])).unwrap();

        td.remove_node(mid).unwrap();
        assert_eq!(td.children(root), &[x, y, z]);
        assert_eq!(td.parent(x), Some(root));
        assert!(td.label("l", mid).is_none());

        td.remove_node(root).unwrap();
        assert_eq!(td.root(), Some(x));
        assert_eq!(td.children(x), &[y, z]);
        assert!(td.verify_structure().is_ok());
    }

    #[test]
    fn move_subtree_rejects_cycles() {
        let mut td = TreeDecomposition::with_root(vec![1]);
        let root = td.root().unwrap();
        let a = td.add_child(root, vec![1]).unwrap();
        let b = td.add_child(a, vec![1]).unwrap();
        assert_eq!(
            td.move_subtree(a, b),
            Err(Error::NodeInOwnSubtree { node: a, target: b })
        );
        td.move_subtree(b, root).unwrap();
        assert_eq!(td.children(root), &[a, b]);
    }

    #[test]
    fn flatten_removes_redundant_bags() {
        let mut td = TreeDecomposition::with_root(vec![1, 2]);
        let root = td.root().unwrap();
        let small = td.add_child(root, vec![2]).unwrap();
        let leaf = td.add_child(small, vec![2, 3]).unwrap();
        let big = td.add_child(root, vec![1, 2, 4]).unwrap();

        let grown = td.flatten().unwrap();
        assert_eq!(grown, vec![root, small]);
        assert_eq!(td.node_count(), 2);
        assert_eq!(td.bag_content(root), &[1, 2, 4]);
        assert_eq!(td.children(root), &[small]);
        assert_eq!(td.bag_content(small), &[2, 3]);
        assert!(!td.is_node(leaf));
        assert!(!td.is_node(big));
        assert!(td.flatten().unwrap().is_empty());
    }

    #[test]
    fn verify_detects_violations() {
        let graph = path_graph();

        let td = TreeDecomposition::with_root(vec![1, 2]);
        assert_eq!(
            td.verify(&graph),
            Err(TreeDecompositionValidationError::MissingVertex(3))
        );

        let mut td = TreeDecomposition::with_root(vec![1, 2]);
        let root = td.root().unwrap();
        td.add_child(root, vec![3]).unwrap();
        assert_eq!(
            td.verify(&graph),
            Err(TreeDecompositionValidationError::MissingEdge(2))
        );

        let mut td = TreeDecomposition::with_root(vec![1]);
        let root = td.root().unwrap();
        td.add_child(root, vec![1, 2]).unwrap();
        td.add_child(root, vec![2, 3]).unwrap();
        assert_eq!(
            td.verify(&graph),
            Err(TreeDecompositionValidationError::NotInducingSubtree(2))
        );
    }

    #[test]
    fn binary_join_check() {
        let mut td = TreeDecomposition::with_root(vec![1, 2]);
        let root = td.root().unwrap();
        td.add_child(root, vec![1, 2]).unwrap();
        let other = td.add_child(root, vec![1]).unwrap();
        assert_eq!(
            td.verify_binary_joins(),
            Err(TreeDecompositionValidationError::InvalidJoinNode(root))
        );
        td.set_bag(other, vec![1, 2]).unwrap();
        assert!(td.verify_binary_joins().is_ok());
    }
}
