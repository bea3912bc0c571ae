#[macro_use]
pub mod util;

pub mod bucket_elimination;
pub mod cancellation;
pub(crate) mod datastructures;
pub mod error;
pub mod factory;
pub mod graph;
pub mod heuristic_elimination_order;
pub mod hypertree_decomposition;
pub mod io;
pub mod labeling;
#[cfg(feature = "pace-logging")]
pub mod log;
pub mod manipulation;
pub mod path_decomposition;
pub mod separator;
#[cfg(feature = "handle-ctrlc")]
pub mod signals;
pub mod timeout;
pub mod tree_decomposition;
pub mod vertex_selection;

pub use error::{Error, Result};
