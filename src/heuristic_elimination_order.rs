use crate::cancellation::CancellationToken;
use crate::datastructures::BinaryQueue;
use crate::error::{Error, Result};
use crate::graph::{HashMapGraph, HypergraphView, Vertex};
use crate::vertex_selection::{ExhaustiveVertexSelection, VertexSelectionStrategy};
use fxhash::{FxHashMap, FxHashSet};
#[cfg(feature = "log")]
use log::debug;
use std::cmp::max;

/// A permutation of the vertices of a graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EliminationOrder {
    data: Vec<Vertex>,
}

impl From<Vec<Vertex>> for EliminationOrder {
    fn from(data: Vec<Vertex>) -> Self {
        Self { data }
    }
}

impl EliminationOrder {
    pub fn new(data: Vec<Vertex>) -> Self {
        Self { data }
    }

    pub fn order(&self) -> &[Vertex] {
        self.data.as_slice()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<Vertex> {
        self.data
    }

    /// Maps every vertex to its index in the order.
    pub fn positions(&self) -> FxHashMap<Vertex, usize> {
        self.data.iter().enumerate().map(|(i, v)| (*v, i)).collect()
    }

    /// Checks that the order is a permutation of the vertices of `graph`.
    pub fn validate(&self, graph: &dyn HypergraphView) -> Result<()> {
        if self.data.len() != graph.vertex_count() {
            return Err(Error::InvalidOrdering(format!(
                "expected {} vertices, got {}",
                graph.vertex_count(),
                self.data.len()
            )));
        }
        let mut seen = FxHashSet::with_capacity_and_hasher(self.data.len(), Default::default());
        for v in self.data.iter().copied() {
            if !graph.is_vertex(v) {
                return Err(Error::InvalidOrdering(format!("{} is not a vertex", v)));
            }
            if !seen.insert(v) {
                return Err(Error::InvalidOrdering(format!("{} appears twice", v)));
            }
        }
        Ok(())
    }

    /// Width of the decomposition induced by eliminating along this order.
    pub fn width(&self, graph: &dyn HypergraphView) -> usize {
        let mut graph = HashMapGraph::from_hypergraph(graph);
        let mut width = 0;
        for v in self.data.iter().copied() {
            width = max(width, graph.degree(v));
            graph.eliminate_vertex(v);
        }
        width
    }
}

pub trait OrderingAlgorithm: Send {
    fn name(&self) -> &'static str;

    /// Computes an elimination order of all vertices of `graph`. Returns
    /// `None` only if `token` is cancelled during the computation.
    fn compute_ordering(
        &self,
        graph: &dyn HypergraphView,
        token: &CancellationToken,
    ) -> Option<EliminationOrder>;
}

/// Vertices by ascending id.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrdering;

impl OrderingAlgorithm for NaturalOrdering {
    fn name(&self) -> &'static str {
        "natural"
    }

    fn compute_ordering(
        &self,
        graph: &dyn HypergraphView,
        token: &CancellationToken,
    ) -> Option<EliminationOrder> {
        if token.is_cancelled() {
            return None;
        }
        let mut data: Vec<Vertex> = graph.vertices().collect();
        data.sort_unstable();
        Some(EliminationOrder::new(data))
    }
}

/// Scores vertices of a working graph and eliminates them one at a time.
pub trait Selector: From<HashMapGraph> {
    fn graph(&self) -> &HashMapGraph;
    fn value(&self, v: Vertex) -> i64;
    /// Eliminates `v` and returns the remaining vertices whose value may have changed.
    fn eliminate_vertex(&mut self, v: Vertex) -> Vec<Vertex>;
}

pub struct MinDegreeSelector {
    graph: HashMapGraph,
}

impl From<HashMapGraph> for MinDegreeSelector {
    fn from(graph: HashMapGraph) -> Self {
        Self { graph }
    }
}

impl Selector for MinDegreeSelector {
    fn graph(&self) -> &HashMapGraph {
        &self.graph
    }

    fn value(&self, v: Vertex) -> i64 {
        self.graph.degree(v) as i64
    }

    fn eliminate_vertex(&mut self, v: Vertex) -> Vec<Vertex> {
        let nb: Vec<Vertex> = self.graph.neighborhood_set(v).iter().copied().collect();
        self.graph.eliminate_vertex(v);
        nb
    }
}

/// Min fill-in selector.
///
/// `cache[u]` holds the number of edges between neighbors of `u`, i.e. the
/// number of triangles through `u`. The fill-in of `u` is then the number of
/// neighbor pairs minus that count. The cache is maintained edge by edge, so
/// only vertices sharing a triangle with a changed edge are touched.
pub struct MinFillSelector {
    graph: HashMapGraph,
    cache: FxHashMap<Vertex, usize>,
    touched: FxHashSet<Vertex>,
}

impl From<HashMapGraph> for MinFillSelector {
    fn from(graph: HashMapGraph) -> Self {
        let mut cache = FxHashMap::with_capacity_and_hasher(graph.order(), Default::default());
        for u in graph.vertices() {
            cache.insert(u, 0);
        }
        for u in graph.vertices() {
            for v in graph
                .neighborhood_set(u)
                .iter()
                .copied()
                .filter(|v| u < *v)
            {
                graph
                    .neighborhood_set(u)
                    .iter()
                    .copied()
                    .filter(|x| v < *x && graph.has_edge(*x, v))
                    .for_each(|x| {
                        *cache.entry(x).or_insert(0) += 1;
                        *cache.entry(u).or_insert(0) += 1;
                        *cache.entry(v).or_insert(0) += 1;
                    })
            }
        }
        Self {
            graph,
            cache,
            touched: FxHashSet::default(),
        }
    }
}

impl Selector for MinFillSelector {
    fn graph(&self) -> &HashMapGraph {
        &self.graph
    }

    fn value(&self, v: Vertex) -> i64 {
        self.fill_in_count(v) as i64
    }

    fn eliminate_vertex(&mut self, v: Vertex) -> Vec<Vertex> {
        self.touched.clear();
        self.touched
            .extend(self.graph.neighborhood_set(v).iter().copied());
        if self.fill_in_count(v) == 0 {
            self.eliminate_fill0(v);
        } else {
            let mut to_add: Vec<(Vertex, Vertex)> = vec![];
            for u in self.graph.neighborhood_set(v) {
                for w in self
                    .graph
                    .neighborhood_set(v)
                    .iter()
                    .filter(|w| u < *w && !self.graph.has_edge(*u, **w))
                {
                    to_add.push((*u, *w));
                }
            }
            for (u, w) in to_add {
                self.add_edge(u, w);
            }
            self.remove_vertex(v);
        }
        self.touched.remove(&v);
        self.touched.drain().collect()
    }
}

impl MinFillSelector {
    fn add_edge(&mut self, u: Vertex, v: Vertex) {
        self.graph.add_edge(u, v);
        for x in self.graph.neighborhood_set(u) {
            if self.graph.has_edge(*x, v) {
                *self.cache.entry(*x).or_insert(0) += 1;
                *self.cache.entry(u).or_insert(0) += 1;
                *self.cache.entry(v).or_insert(0) += 1;
                self.touched.insert(*x);
            }
        }
    }

    fn remove_vertex(&mut self, u: Vertex) {
        let nb: Vec<Vertex> = self.graph.neighborhood_set(u).iter().copied().collect();
        for v in nb {
            self.remove_edge(u, v);
        }
        self.graph.remove_vertex(u);
        self.cache.remove(&u);
    }

    fn remove_edge(&mut self, u: Vertex, v: Vertex) {
        self.graph.remove_edge(u, v);

        for x in self.graph.neighborhood_set(u) {
            if self.graph.has_edge(*x, v) {
                decrement(&mut self.cache, *x);
                decrement(&mut self.cache, u);
                decrement(&mut self.cache, v);
                self.touched.insert(*x);
            }
        }
    }

    fn eliminate_fill0(&mut self, u: Vertex) {
        // the neighborhood is a clique, so every neighbor loses exactly deg(u) - 1 triangles
        if self.graph.degree(u) > 1 {
            let delta = self.graph.degree(u) - 1;
            let graph = &self.graph;
            let cache = &mut self.cache;
            graph.neighborhood_set(u).iter().copied().for_each(|v| {
                if let Some(c) = cache.get_mut(&v) {
                    *c -= delta;
                }
            });
        }
        self.graph.remove_vertex(u);
        self.cache.remove(&u);
    }

    fn fill_in_count(&self, u: Vertex) -> usize {
        let deg = self.graph.degree(u);
        (deg * deg - deg) / 2 - self.cache.get(&u).copied().unwrap_or(0)
    }
}

#[inline]
fn decrement(cache: &mut FxHashMap<Vertex, usize>, v: Vertex) {
    if let Some(c) = cache.get_mut(&v) {
        *c -= 1;
    }
}

/// Repeatedly eliminates the vertex with the smallest selector value, ties
/// broken by lowest id. Only vertices reported as affected are re-scored.
pub fn heuristic_elimination_order<S: Selector>(
    graph: &dyn HypergraphView,
    token: &CancellationToken,
) -> Option<EliminationOrder> {
    let mut selector = S::from(HashMapGraph::from_hypergraph(graph));
    let mut pq = BinaryQueue::new();
    for v in graph.vertices() {
        pq.insert(v, selector.value(v));
    }

    let mut order = Vec::with_capacity(graph.vertex_count());
    while let Some((u, _)) = pq.pop_min() {
        if token.is_cancelled() {
            #[cfg(feature = "log")]
            debug!("ordering cancelled after {} vertices", order.len());
            return None;
        }
        order.push(u);
        for v in selector.eliminate_vertex(u) {
            if pq.contains(v) {
                pq.insert(v, selector.value(v));
            }
        }
    }
    Some(EliminationOrder::new(order))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MinFillOrdering;

impl OrderingAlgorithm for MinFillOrdering {
    fn name(&self) -> &'static str {
        "min-fill"
    }

    fn compute_ordering(
        &self,
        graph: &dyn HypergraphView,
        token: &CancellationToken,
    ) -> Option<EliminationOrder> {
        heuristic_elimination_order::<MinFillSelector>(graph, token)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MinDegreeOrdering;

impl OrderingAlgorithm for MinDegreeOrdering {
    fn name(&self) -> &'static str {
        "min-degree"
    }

    fn compute_ordering(
        &self,
        graph: &dyn HypergraphView,
        token: &CancellationToken,
    ) -> Option<EliminationOrder> {
        heuristic_elimination_order::<MinDegreeSelector>(graph, token)
    }
}

/// Maximum cardinality search: vertices are visited by descending number of
/// already visited neighbors, and the elimination order is the reversed
/// visit order. The search starts at the first vertex of the selection.
pub struct MaximumCardinalitySearchOrdering {
    selection: Box<dyn VertexSelectionStrategy>,
}

impl Default for MaximumCardinalitySearchOrdering {
    fn default() -> Self {
        Self {
            selection: Box::new(ExhaustiveVertexSelection),
        }
    }
}

impl MaximumCardinalitySearchOrdering {
    pub fn with_selection(selection: Box<dyn VertexSelectionStrategy>) -> Self {
        Self { selection }
    }
}

impl OrderingAlgorithm for MaximumCardinalitySearchOrdering {
    fn name(&self) -> &'static str {
        "max-cardinality-search"
    }

    fn compute_ordering(
        &self,
        graph: &dyn HypergraphView,
        token: &CancellationToken,
    ) -> Option<EliminationOrder> {
        let primal = HashMapGraph::from_hypergraph(graph);
        let mut pq = BinaryQueue::new();
        for v in graph.vertices() {
            pq.insert(v, 0);
        }
        if let Some(start) = self.selection.select_vertices(graph).first() {
            pq.insert(*start, -1);
        }

        let mut visited = Vec::with_capacity(graph.vertex_count());
        while let Some((u, _)) = pq.pop_min() {
            if token.is_cancelled() {
                return None;
            }
            visited.push(u);
            for w in primal.neighborhood_set(u).iter().copied() {
                if let Some(p) = pq.priority(w) {
                    pq.insert(w, p - 1);
                }
            }
        }
        visited.reverse();
        Some(EliminationOrder::new(visited))
    }
}
