use crate::error::Result;
use crate::graph::{EdgeId, Hyperedge, HypergraphView, Vertex};
use crate::tree_decomposition::{Decomposition, Label, NodeId, TreeDecomposition};
use crate::util::{contains, difference, is_subset};
use fxhash::FxHashMap;

/// Computes auxiliary per-node information from a bag and the graph.
pub trait LabelingFunction: Send + Sync {
    /// Name the label is stored under.
    fn name(&self) -> &'static str;

    fn compute_label(&self, bag: &[Vertex], graph: &dyn HypergraphView) -> Label;
}

/// Ids of all hyperedges whose vertices lie inside the bag.
#[derive(Clone, Copy, Debug, Default)]
pub struct InducedEdgesLabeling;

pub const INDUCED_EDGES: &str = "induced_edges";
pub const COVERING_EDGES: &str = "covering_edges";

impl LabelingFunction for InducedEdgesLabeling {
    fn name(&self) -> &'static str {
        INDUCED_EDGES
    }

    fn compute_label(&self, bag: &[Vertex], graph: &dyn HypergraphView) -> Label {
        let mut ids: Vec<EdgeId> = candidate_edges(bag, graph)
            .into_iter()
            .filter(|e| is_subset(&e.sorted_elements(), bag))
            .map(|e| e.id())
            .collect();
        ids.sort_unstable();
        Label::Hyperedges(ids)
    }
}

/// Greedy hyperedge cover of the bag.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeCoverLabeling;

impl LabelingFunction for EdgeCoverLabeling {
    fn name(&self) -> &'static str {
        COVERING_EDGES
    }

    fn compute_label(&self, bag: &[Vertex], graph: &dyn HypergraphView) -> Label {
        Label::Hyperedges(greedy_edge_cover(bag, graph))
    }
}

fn candidate_edges<'a>(bag: &[Vertex], graph: &'a dyn HypergraphView) -> Vec<&'a Hyperedge> {
    let mut edges: FxHashMap<EdgeId, &'a Hyperedge> = FxHashMap::default();
    for v in bag.iter().copied() {
        for e in graph.incident_edges(v) {
            edges.insert(e.id(), e);
        }
    }
    let mut edges: Vec<&Hyperedge> = edges.into_iter().map(|(_, e)| e).collect();
    edges.sort_unstable_by_key(|e| e.id());
    edges
}

/// Repeatedly picks the hyperedge covering the most uncovered bag vertices,
/// lowest id on ties. Bag vertices without incident edges stay uncovered.
/// The result is sorted by edge id.
pub fn greedy_edge_cover(bag: &[Vertex], graph: &dyn HypergraphView) -> Vec<EdgeId> {
    let candidates: Vec<(EdgeId, Vec<Vertex>)> = candidate_edges(bag, graph)
        .into_iter()
        .map(|e| (e.id(), e.sorted_elements()))
        .collect();
    let mut uncovered: Vec<Vertex> = bag
        .iter()
        .copied()
        .filter(|v| candidates.iter().any(|(_, e)| contains(e, *v)))
        .collect();

    let mut cover = Vec::new();
    while !uncovered.is_empty() {
        let mut best: Option<(usize, EdgeId, &Vec<Vertex>)> = None;
        for (id, elements) in candidates.iter() {
            let gain = uncovered.iter().filter(|v| contains(elements, **v)).count();
            if gain > 0 && best.map_or(true, |(g, _, _)| gain > g) {
                best = Some((gain, *id, elements));
            }
        }
        match best {
            Some((_, id, elements)) => {
                uncovered = difference(&uncovered, elements);
                cover.push(id);
            }
            None => break,
        }
    }
    cover.sort_unstable();
    cover
}

/// Recomputes every labeling function for `nodes`.
pub fn label_nodes(
    graph: &dyn HypergraphView,
    decomposition: &mut TreeDecomposition,
    labeling_functions: &[Box<dyn LabelingFunction>],
    nodes: &[NodeId],
) -> Result<()> {
    for function in labeling_functions {
        for node in nodes.iter().copied() {
            let label = function.compute_label(decomposition.bag_content(node), graph);
            decomposition.set_label(function.name(), node, label)?;
        }
    }
    Ok(())
}
