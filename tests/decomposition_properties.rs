use fxhash::FxHashSet;
use htd::bucket_elimination::{BucketEliminationTreeDecompositionAlgorithm, TreeDecompositionAlgorithm};
use htd::cancellation::CancellationToken;
use htd::factory::AlgorithmFactory;
use htd::graph::{HashMapGraph, HypergraphView, MultiHypergraph, MutableHypergraph};
use htd::heuristic_elimination_order::{
    EliminationOrder, MaximumCardinalitySearchOrdering, MinDegreeOrdering, MinFillOrdering, NaturalOrdering,
    OrderingAlgorithm,
};
use htd::hypertree_decomposition::HypertreeDecompositionAlgorithm;
use htd::labeling::{EdgeCoverLabeling, InducedEdgesLabeling, LabelingFunction, INDUCED_EDGES};
use htd::manipulation::{JoinNodeReplacementOperation, ManipulationOperation, NormalizationOperation};
use htd::path_decomposition::PathDecompositionAlgorithm;
use htd::tree_decomposition::{Decomposition, Label, RootedTree, TreeDecomposition};
use htd::util::{difference, is_subset, sorted_set};
use htd::vertex_selection::RandomVertexSelection;
use rand::prelude::StdRng;
use rand::{Rng, SeedableRng};

fn random_hypergraph(n: usize, m: usize, max_arity: usize, seed: u64) -> MultiHypergraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = MultiHypergraph::with_vertices(n);
    for _ in 0..m {
        let arity = rng.gen_range(1..=max_arity);
        let edge: Vec<usize> = (0..arity).map(|_| rng.gen_range(1..=n)).collect();
        graph.add_hyperedge(edge).unwrap();
    }
    graph
}

fn graphs() -> Vec<MultiHypergraph> {
    vec![
        random_hypergraph(20, 30, 2, 1),
        random_hypergraph(40, 25, 4, 2),
        random_hypergraph(60, 120, 3, 3),
        random_hypergraph(15, 0, 1, 4),
    ]
}

fn orderings() -> Vec<Box<dyn OrderingAlgorithm>> {
    vec![
        Box::new(NaturalOrdering),
        Box::new(MinFillOrdering),
        Box::new(MinDegreeOrdering),
        Box::new(MaximumCardinalitySearchOrdering::with_selection(Box::new(
            RandomVertexSelection::new(1, 9),
        ))),
    ]
}

fn decompose(
    graph: &MultiHypergraph,
    ordering: Box<dyn OrderingAlgorithm>,
    operations: &[Box<dyn ManipulationOperation>],
) -> TreeDecomposition {
    BucketEliminationTreeDecompositionAlgorithm::new(ordering)
        .compute_decomposition(graph, operations, &CancellationToken::new())
        .unwrap()
        .unwrap()
}

#[test]
fn every_decomposition_is_valid() {
    for graph in graphs() {
        for ordering in orderings() {
            let td = decompose(&graph, ordering, &[]);
            assert!(td.verify(&graph).is_ok());
            // every vertex appears in a bag and every hyperedge lies in one
            for v in graph.vertices() {
                assert!(td.nodes().into_iter().any(|n| td.bag_content(n).contains(&v)));
            }
            for e in graph.hyperedges() {
                let elements = e.sorted_elements();
                assert!(td
                    .nodes()
                    .into_iter()
                    .any(|n| is_subset(&elements, td.bag_content(n))));
            }
            assert!(td.width() + 1 >= graph.largest_hyperedge_size());
        }
    }
}

#[test]
fn orderings_are_bijections() {
    let token = CancellationToken::new();
    for graph in graphs() {
        for ordering in orderings() {
            let order = ordering.compute_ordering(&graph, &token).unwrap();
            let mut vertices = order.into_vec();
            vertices.sort_unstable();
            assert_eq!(vertices, graph.vertices().collect::<Vec<_>>());
        }
    }
}

#[test]
fn two_edge_path_under_natural_ordering() {
    let graph = MultiHypergraph::from_edges(3, vec![vec![1, 2], vec![2, 3]]).unwrap();
    let order = NaturalOrdering
        .compute_ordering(&graph, &CancellationToken::new())
        .unwrap();
    assert_eq!(order.order(), &[1, 2, 3]);
    let td = decompose(&graph, Box::new(NaturalOrdering), &[]);
    assert!(td.node_count() <= 2);
    assert_eq!(td.width(), 1);
}

#[test]
fn empty_graph() {
    let graph = MultiHypergraph::new();
    let order = MinFillOrdering
        .compute_ordering(&graph, &CancellationToken::new())
        .unwrap();
    assert!(order.is_empty());
    let td = decompose(&graph, Box::new(MinFillOrdering), &[]);
    assert_eq!(td.node_count(), 1);
    assert_eq!(td.width(), 0);
}

#[test]
fn cancelled_requests_yield_none() {
    let token = CancellationToken::new();
    token.cancel();
    let graph = random_hypergraph(30, 40, 3, 5);
    assert!(MinFillOrdering.compute_ordering(&graph, &token).is_none());
    assert!(BucketEliminationTreeDecompositionAlgorithm::default()
        .compute_decomposition(&graph, &[], &token)
        .unwrap()
        .is_none());
    assert!(HypertreeDecompositionAlgorithm::default()
        .compute_decomposition(&graph, &[], &token)
        .unwrap()
        .is_none());
}

/// Cancels the shared token when applied, leaving the decomposition untouched.
struct CancellingOperation(CancellationToken);

impl ManipulationOperation for CancellingOperation {
    fn name(&self) -> &'static str {
        "cancel"
    }

    fn apply(
        &self,
        _graph: &dyn HypergraphView,
        _decomposition: &mut TreeDecomposition,
        _labeling_functions: &[Box<dyn LabelingFunction>],
    ) -> htd::Result<()> {
        self.0.cancel();
        Ok(())
    }
}

/// Computes the inner ordering, then cancels the token before handing it back.
struct CancellingOrdering(Box<dyn OrderingAlgorithm>, CancellationToken);

impl OrderingAlgorithm for CancellingOrdering {
    fn name(&self) -> &'static str {
        "cancelling"
    }

    fn compute_ordering(&self, graph: &dyn HypergraphView, token: &CancellationToken) -> Option<EliminationOrder> {
        let order = self.0.compute_ordering(graph, token);
        self.1.cancel();
        order
    }
}

#[test]
fn cancel_between_operations() {
    let graph = random_hypergraph(30, 40, 3, 7);
    let token = CancellationToken::new();
    let operations: Vec<Box<dyn ManipulationOperation>> = vec![
        Box::new(CancellingOperation(token.clone())),
        Box::new(JoinNodeReplacementOperation),
    ];
    let result = BucketEliminationTreeDecompositionAlgorithm::default()
        .compute_decomposition(&graph, &operations, &token)
        .unwrap();
    assert!(result.is_none());
    assert!(token.is_cancelled());

    token.reset();
    let hypertree = HypertreeDecompositionAlgorithm::default()
        .compute_decomposition(&graph, &operations, &token)
        .unwrap();
    assert!(hypertree.is_none());
}

#[test]
fn cancel_during_bucket_elimination() {
    let graph = random_hypergraph(30, 40, 3, 8);
    let token = CancellationToken::new();
    let ordering = CancellingOrdering(Box::new(MinFillOrdering), token.clone());
    let result = BucketEliminationTreeDecompositionAlgorithm::new(Box::new(ordering))
        .compute_decomposition(&graph, &[], &token)
        .unwrap();
    assert!(result.is_none());

    token.reset();
    let path = PathDecompositionAlgorithm::new(Box::new(BucketEliminationTreeDecompositionAlgorithm::new(
        Box::new(CancellingOrdering(Box::new(NaturalOrdering), token.clone())),
    )))
    .compute_decomposition(&graph, &[], &token)
    .unwrap();
    assert!(path.is_none());
}

#[test]
fn join_node_replacement_is_idempotent() {
    let operations: Vec<Box<dyn ManipulationOperation>> = vec![Box::new(JoinNodeReplacementOperation)];
    for graph in graphs() {
        let mut td = decompose(&graph, Box::new(MinFillOrdering), &operations);
        assert!(td.verify(&graph).is_ok());
        assert!(td.verify_binary_joins().is_ok());
        let once = td.clone();
        JoinNodeReplacementOperation.apply(&graph, &mut td, &[]).unwrap();
        assert_eq!(td, once);
    }
}

#[test]
fn normalization_yields_nice_decompositions() {
    let operations: Vec<Box<dyn ManipulationOperation>> = vec![Box::new(
        NormalizationOperation::new()
            .empty_root(true)
            .empty_leaves(true)
            .identical_join_node_parent(true),
    )];
    for graph in graphs() {
        let td = decompose(&graph, Box::new(MinDegreeOrdering), &operations);
        assert!(td.verify(&graph).is_ok());
        assert!(td.verify_binary_joins().is_ok());
        assert!(td.bag_content(td.root().unwrap()).is_empty());
        for n in td.nodes() {
            if td.is_leaf(n) {
                assert!(td.bag_content(n).is_empty());
            } else if !td.is_join_node(n) {
                let introduced = td.introduced_vertices(n).len();
                let forgotten = td.forgotten_vertices(n).len();
                assert!(introduced + forgotten <= 1);
            }
        }
    }
}

#[test]
fn labels_cover_every_node() {
    let graph = random_hypergraph(25, 30, 3, 6);
    let functions: Vec<Box<dyn LabelingFunction>> =
        vec![Box::new(InducedEdgesLabeling), Box::new(EdgeCoverLabeling)];
    let operations: Vec<Box<dyn ManipulationOperation>> = vec![Box::new(NormalizationOperation::new())];
    let td = BucketEliminationTreeDecompositionAlgorithm::default()
        .labeling_functions(functions)
        .compute_decomposition(&graph, &operations, &CancellationToken::new())
        .unwrap()
        .unwrap();
    for n in td.nodes() {
        match td.label(INDUCED_EDGES, n) {
            Some(Label::Hyperedges(edges)) => {
                for e in edges {
                    let elements = graph.hyperedge(*e).unwrap().sorted_elements();
                    assert!(is_subset(&elements, td.bag_content(n)));
                }
            }
            other => panic!("unexpected label {:?}", other),
        }
    }
}

#[test]
fn path_decompositions_are_paths() {
    for graph in graphs() {
        let td = PathDecompositionAlgorithm::default()
            .compute_decomposition(&graph, &[], &CancellationToken::new())
            .unwrap()
            .unwrap();
        assert!(td.verify(&graph).is_ok());
        assert!(td.nodes().into_iter().all(|n| td.children(n).len() <= 1));
    }
}

#[test]
fn hypertree_bags_are_covered() {
    for graph in graphs() {
        let htd = HypertreeDecompositionAlgorithm::default()
            .compute_decomposition(&graph, &[], &CancellationToken::new())
            .unwrap()
            .unwrap();
        assert!(htd.tree_decomposition().verify(&graph).is_ok());
        for n in htd.nodes() {
            let covered = sorted_set(
                htd.covering_edges(n)
                    .iter()
                    .flat_map(|e| graph.hyperedge(*e).unwrap().sorted_elements()),
            );
            let uncovered = difference(htd.bag_content(n), &covered);
            assert!(uncovered
                .iter()
                .all(|v| graph.incident_edges(*v).next().is_none()));
        }
    }
}

#[test]
fn separators_are_balanced() {
    let factory = AlgorithmFactory::new();
    let token = CancellationToken::new();
    for graph in graphs() {
        let separator = factory
            .create_separator_algorithm()
            .compute_separator(&graph, &token)
            .unwrap()
            .unwrap();
        let separator: FxHashSet<usize> = separator.into_iter().collect();
        let n = graph.vertex_count();
        for component in HashMapGraph::from_hypergraph(&graph).separate(&separator) {
            assert!(2 * component.len() <= n);
        }
    }
}

#[test]
fn factory_substitutes_orderings() {
    let mut factory = AlgorithmFactory::new();
    factory.set_ordering_template(|_| Box::new(NaturalOrdering));
    let graph = MultiHypergraph::from_edges(3, vec![vec![1, 2], vec![2, 3]]).unwrap();
    let td = factory
        .create_tree_decomposition_algorithm()
        .compute_decomposition(&graph, &[], &CancellationToken::new())
        .unwrap()
        .unwrap();
    assert_eq!(td.width(), 1);
    assert_eq!(
        factory
            .create_connected_component_algorithm()
            .determine_components(&graph),
        vec![vec![1, 2, 3]]
    );
}
