use crate::error::{Error, Result};
use crate::graph::hypergraph::{EdgeId, Hyperedge, HypergraphView, Vertex};
use crate::graph::mutable_graph::MutableHypergraph;
use crate::util::contains;
use fxhash::FxHashMap;
use std::collections::BTreeMap;

/// Hypergraph allowing duplicate vertices inside an edge and parallel edges.
#[derive(Clone, Debug)]
pub struct MultiHypergraph {
    vertices: Vec<Vertex>,
    incidence: FxHashMap<Vertex, Vec<EdgeId>>,
    edges: BTreeMap<EdgeId, Hyperedge>,
    next_vertex: Vertex,
    next_edge: EdgeId,
}

impl Default for MultiHypergraph {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            incidence: FxHashMap::default(),
            edges: BTreeMap::new(),
            next_vertex: 1,
            next_edge: 1,
        }
    }
}

impl MultiHypergraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph with vertices `1..=count` and no edges.
    pub fn with_vertices(count: usize) -> Self {
        let mut graph = Self::new();
        graph.add_vertices(count);
        graph
    }

    /// Builds a graph on `1..=count` from a list of edges.
    pub fn from_edges<I, E>(count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Vec<Vertex>>,
    {
        let mut graph = Self::with_vertices(count);
        for edge in edges {
            graph.add_hyperedge(edge.into())?;
        }
        Ok(graph)
    }

    /// Sub-hypergraph on `vertices` (ids preserved) keeping every hyperedge
    /// whose elements all lie in `vertices`.
    pub fn induced_subgraph(&self, vertices: &[Vertex]) -> Result<Self> {
        let mut selected: Vec<Vertex> = vertices.to_vec();
        selected.sort_unstable();
        selected.dedup();
        if let Some(v) = selected.iter().copied().find(|v| !self.is_vertex(*v)) {
            return Err(Error::UnknownVertex(v));
        }
        let mut subgraph = Self {
            next_vertex: self.next_vertex,
            next_edge: self.next_edge,
            ..Self::default()
        };
        for v in selected.iter().copied() {
            subgraph.vertices.push(v);
            subgraph.incidence.insert(v, Vec::new());
        }
        for edge in self
            .edges
            .values()
            .filter(|e| e.elements().iter().all(|v| contains(&selected, *v)))
        {
            subgraph.insert_edge(edge.clone());
        }
        Ok(subgraph)
    }

    fn insert_edge(&mut self, edge: Hyperedge) {
        for v in edge.sorted_elements() {
            if let Some(incident) = self.incidence.get_mut(&v) {
                incident.push(edge.id());
            }
        }
        self.edges.insert(edge.id(), edge);
    }

    fn incident_ids(&self, v: Vertex) -> &[EdgeId] {
        match self.incidence.get(&v) {
            Some(ids) => ids,
            None => panic!("{} is not a vertex", v),
        }
    }
}

impl HypergraphView for MultiHypergraph {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = Vertex> + '_> {
        Box::new(self.vertices.iter().copied())
    }

    fn is_vertex(&self, v: Vertex) -> bool {
        self.incidence.contains_key(&v)
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn hyperedges(&self) -> Box<dyn Iterator<Item = &Hyperedge> + '_> {
        Box::new(self.edges.values())
    }

    fn hyperedge(&self, id: EdgeId) -> Option<&Hyperedge> {
        self.edges.get(&id)
    }

    fn incident_edges(&self, v: Vertex) -> Box<dyn Iterator<Item = &Hyperedge> + '_> {
        let edges = &self.edges;
        Box::new(self.incident_ids(v).iter().map(move |id| &edges[id]))
    }
}

impl MutableHypergraph for MultiHypergraph {
    fn add_vertex(&mut self) -> Vertex {
        let v = self.next_vertex;
        self.next_vertex += 1;
        self.vertices.push(v);
        self.incidence.insert(v, Vec::new());
        v
    }

    fn remove_vertex(&mut self, v: Vertex) -> Result<()> {
        let incident = self.incidence.remove(&v).ok_or(Error::UnknownVertex(v))?;
        if let Ok(idx) = self.vertices.binary_search(&v) {
            self.vertices.remove(idx);
        }
        for id in incident {
            let now_empty = match self.edges.get_mut(&id) {
                Some(edge) => {
                    edge.retain(v);
                    edge.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.edges.remove(&id);
            }
        }
        Ok(())
    }

    fn add_hyperedge(&mut self, elements: Vec<Vertex>) -> Result<EdgeId> {
        if elements.is_empty() {
            return Err(Error::EmptyHyperedge);
        }
        if let Some(v) = elements.iter().copied().find(|v| !self.is_vertex(*v)) {
            return Err(Error::UnknownVertex(v));
        }
        let id = self.next_edge;
        self.next_edge += 1;
        self.insert_edge(Hyperedge::new(id, elements));
        Ok(id)
    }

    fn remove_edge(&mut self, id: EdgeId) -> Result<()> {
        let edge = self.edges.remove(&id).ok_or(Error::UnknownEdge(id))?;
        for v in edge.sorted_elements() {
            if let Some(incident) = self.incidence.get_mut(&v) {
                incident.retain(|e| *e != id);
            }
        }
        Ok(())
    }
}
