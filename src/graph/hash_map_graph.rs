use crate::graph::hypergraph::{HypergraphView, Vertex};
use fxhash::{FxHashMap, FxHashSet};

/// Simple undirected adjacency-set graph used as the working copy that the
/// elimination heuristics mutate.
#[derive(Clone, Debug, Default)]
pub struct HashMapGraph {
    data: FxHashMap<Vertex, FxHashSet<Vertex>>,
}

impl HashMapGraph {
    pub fn new() -> Self {
        HashMapGraph {
            data: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        HashMapGraph {
            data: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Primal graph of a hypergraph: every hyperedge becomes a clique.
    pub fn from_hypergraph(graph: &dyn HypergraphView) -> Self {
        let mut primal = Self::with_capacity(graph.vertex_count());
        for v in graph.vertices() {
            primal.add_vertex(v);
        }
        for edge in graph.hyperedges() {
            primal.make_clique(&edge.sorted_elements());
        }
        primal
    }

    pub fn has_vertex(&self, u: Vertex) -> bool {
        self.data.contains_key(&u)
    }

    pub fn neighborhood_set(&self, u: Vertex) -> &FxHashSet<Vertex> {
        match self.data.get(&u) {
            Some(nb) => nb,
            None => panic!("{} is not a vertex", u),
        }
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.data.keys().copied()
    }

    pub fn order(&self) -> usize {
        self.data.len()
    }

    pub fn degree(&self, u: Vertex) -> usize {
        self.neighborhood_set(u).len()
    }

    pub fn has_edge(&self, u: Vertex, v: Vertex) -> bool {
        self.neighborhood_set(u).contains(&v)
    }

    pub fn add_vertex(&mut self, u: Vertex) {
        self.data.entry(u).or_insert_with(FxHashSet::default);
    }

    pub fn remove_vertex(&mut self, u: Vertex) {
        if let Some(neighbors) = self.data.remove(&u) {
            for i in neighbors.iter() {
                if let Some(nb) = self.data.get_mut(i) {
                    nb.remove(&u);
                }
            }
        }
    }

    pub fn add_edge(&mut self, u: Vertex, v: Vertex) {
        assert_ne!(u, v);
        self.data.entry(u).or_insert_with(FxHashSet::default).insert(v);
        self.data.entry(v).or_insert_with(FxHashSet::default).insert(u);
    }

    pub fn remove_edge(&mut self, u: Vertex, v: Vertex) {
        if let Some(x) = self.data.get_mut(&u) {
            x.remove(&v);
        }
        if let Some(x) = self.data.get_mut(&v) {
            x.remove(&u);
        }
    }

    pub fn make_clique(&mut self, vertices: &[Vertex]) {
        for (i, v) in vertices.iter().enumerate() {
            for u in vertices.iter().skip(i + 1) {
                if u != v {
                    self.add_edge(*u, *v);
                }
            }
        }
    }

    /// Turns the neighborhood of `u` into a clique and removes `u`.
    pub fn eliminate_vertex(&mut self, u: Vertex) {
        let nb = match self.data.remove(&u) {
            Some(nb) => nb,
            None => panic!("{} is not a vertex", u),
        };
        for i in &nb {
            if let Some(x) = self.data.get_mut(i) {
                x.remove(&u);
            }
        }
        for i in &nb {
            for j in &nb {
                if i < j {
                    self.add_edge(*i, *j);
                }
            }
        }
    }

    /// Number of missing edges inside the neighborhood of `u`.
    pub fn fill_in_count(&self, u: Vertex) -> usize {
        let mut count = 0;
        for x in self.neighborhood_set(u) {
            for y in self.neighborhood_set(u) {
                if x < y && !self.has_edge(*x, *y) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Connected components of the graph after removing `separator`.
    /// Components are sorted and ordered by their smallest vertex.
    pub fn separate(&self, separator: &FxHashSet<Vertex>) -> Vec<Vec<Vertex>> {
        let mut components: Vec<Vec<Vertex>> = Vec::with_capacity(2);

        let mut stack: Vec<_> = Vec::with_capacity(self.data.len());
        let mut visited = FxHashSet::with_capacity_and_hasher(self.data.len(), Default::default());
        let mut roots: Vec<Vertex> = self.data.keys().copied().collect();
        roots.sort_unstable();
        for u in roots {
            if separator.contains(&u) || visited.contains(&u) {
                continue;
            }
            stack.push(u);
            visited.insert(u);
            let mut component = vec![u];
            while let Some(v) = stack.pop() {
                for x in self.neighborhood_set(v).iter() {
                    if visited.contains(x) || separator.contains(x) {
                        continue;
                    }
                    stack.push(*x);
                    component.push(*x);
                    visited.insert(*x);
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }

    pub fn connected_components(&self) -> Vec<Vec<Vertex>> {
        self.separate(&FxHashSet::default())
    }
}
