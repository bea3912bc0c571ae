use crate::bucket_elimination::{BucketEliminationTreeDecompositionAlgorithm, TreeDecompositionAlgorithm};
use crate::heuristic_elimination_order::{MinFillOrdering, OrderingAlgorithm};
use crate::separator::{
    ConnectedComponentAlgorithm, DepthFirstConnectedComponents, SeparatorAlgorithm,
    TreeDecompositionSeparator,
};
use std::fmt;

/// Closure producing a fresh algorithm instance. It receives the factory so
/// composite algorithms can build their parts from the current templates.
pub type ConstructionTemplate<T> = Box<dyn Fn(&AlgorithmFactory) -> Box<T> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Ordering,
    Separator,
    ConnectedComponents,
    TreeDecomposition,
}

/// Hands out algorithm instances for each [`Role`].
///
/// Configuration needs `&mut self` while creation only needs `&self`, so a
/// configured factory can be shared behind an `Arc`.
pub struct AlgorithmFactory {
    ordering: ConstructionTemplate<dyn OrderingAlgorithm>,
    separator: ConstructionTemplate<dyn SeparatorAlgorithm>,
    connected_components: ConstructionTemplate<dyn ConnectedComponentAlgorithm>,
    tree_decomposition: ConstructionTemplate<dyn TreeDecompositionAlgorithm>,
}

impl fmt::Debug for AlgorithmFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmFactory").finish()
    }
}

impl Default for AlgorithmFactory {
    fn default() -> Self {
        Self {
            ordering: default_ordering(),
            separator: default_separator(),
            connected_components: default_connected_components(),
            tree_decomposition: default_tree_decomposition(),
        }
    }
}

fn default_ordering() -> ConstructionTemplate<dyn OrderingAlgorithm> {
    Box::new(|_: &AlgorithmFactory| -> Box<dyn OrderingAlgorithm> { Box::new(MinFillOrdering) })
}

fn default_separator() -> ConstructionTemplate<dyn SeparatorAlgorithm> {
    Box::new(|factory: &AlgorithmFactory| -> Box<dyn SeparatorAlgorithm> {
        Box::new(TreeDecompositionSeparator::new(
            factory.create_tree_decomposition_algorithm(),
        ))
    })
}

fn default_connected_components() -> ConstructionTemplate<dyn ConnectedComponentAlgorithm> {
    Box::new(|_: &AlgorithmFactory| -> Box<dyn ConnectedComponentAlgorithm> {
        Box::new(DepthFirstConnectedComponents)
    })
}

fn default_tree_decomposition() -> ConstructionTemplate<dyn TreeDecompositionAlgorithm> {
    Box::new(|factory: &AlgorithmFactory| -> Box<dyn TreeDecompositionAlgorithm> {
        Box::new(BucketEliminationTreeDecompositionAlgorithm::new(
            factory.create_ordering_algorithm(),
        ))
    })
}

impl AlgorithmFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_ordering_algorithm(&self) -> Box<dyn OrderingAlgorithm> {
        (self.ordering)(self)
    }

    pub fn create_separator_algorithm(&self) -> Box<dyn SeparatorAlgorithm> {
        (self.separator)(self)
    }

    pub fn create_connected_component_algorithm(&self) -> Box<dyn ConnectedComponentAlgorithm> {
        (self.connected_components)(self)
    }

    pub fn create_tree_decomposition_algorithm(&self) -> Box<dyn TreeDecompositionAlgorithm> {
        (self.tree_decomposition)(self)
    }

    pub fn set_ordering_template<F>(&mut self, template: F)
    where
        F: Fn(&AlgorithmFactory) -> Box<dyn OrderingAlgorithm> + Send + Sync + 'static,
    {
        self.ordering = Box::new(template);
    }

    pub fn set_separator_template<F>(&mut self, template: F)
    where
        F: Fn(&AlgorithmFactory) -> Box<dyn SeparatorAlgorithm> + Send + Sync + 'static,
    {
        self.separator = Box::new(template);
    }

    pub fn set_connected_component_template<F>(&mut self, template: F)
    where
        F: Fn(&AlgorithmFactory) -> Box<dyn ConnectedComponentAlgorithm> + Send + Sync + 'static,
    {
        self.connected_components = Box::new(template);
    }

    pub fn set_tree_decomposition_template<F>(&mut self, template: F)
    where
        F: Fn(&AlgorithmFactory) -> Box<dyn TreeDecompositionAlgorithm> + Send + Sync + 'static,
    {
        self.tree_decomposition = Box::new(template);
    }

    /// Restores the built-in template of `role`.
    pub fn reset(&mut self, role: Role) {
        match role {
            Role::Ordering => self.ordering = default_ordering(),
            Role::Separator => self.separator = default_separator(),
            Role::ConnectedComponents => self.connected_components = default_connected_components(),
            Role::TreeDecomposition => self.tree_decomposition = default_tree_decomposition(),
        }
    }
}
