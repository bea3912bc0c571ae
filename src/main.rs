use htd::bucket_elimination::BucketEliminationTreeDecompositionAlgorithm;
use htd::cancellation::CancellationToken;
use htd::factory::AlgorithmFactory;
use htd::graph::{HypergraphView, MultiHypergraph};
use htd::heuristic_elimination_order::{
    MaximumCardinalitySearchOrdering, MinDegreeOrdering, MinFillOrdering, NaturalOrdering,
    OrderingAlgorithm,
};
use htd::hypertree_decomposition::HypertreeDecompositionAlgorithm;
use htd::io::{HgrReader, PaceReader, TdWriter};
use htd::log::{build_pace_logger, level_for_verbosity};
use htd::manipulation::{
    AddEmptyLeavesOperation, AddEmptyRootOperation, CompressionOperation,
    JoinNodeReplacementOperation, ManipulationOperation, NormalizationOperation,
};
use htd::path_decomposition::PathDecompositionAlgorithm;
use htd::timeout::initialize_timeout;
use htd::tree_decomposition::{Decomposition, RootedTree, TreeDecomposition};
use htd::vertex_selection::RandomVertexSelection;
use log::{info, warn};
use std::convert::TryFrom;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{stdin, stdout, BufRead, BufReader, ErrorKind};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use structopt::StructOpt;

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, Clone, Copy)]
enum InputFormat {
    Pace,
    Hgr,
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pace" | "gr" => Ok(Self::Pace),
            "hgr" | "htd" => Ok(Self::Hgr),
            _ => Err(format!("unknown input format `{}`", s)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Ordering {
    MinFill,
    MinDegree,
    Natural,
    MaximumCardinalitySearch,
}

impl FromStr for Ordering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min-fill" => Ok(Self::MinFill),
            "min-degree" => Ok(Self::MinDegree),
            "natural" => Ok(Self::Natural),
            "mcs" => Ok(Self::MaximumCardinalitySearch),
            _ => Err(format!("unknown ordering `{}`", s)),
        }
    }
}

impl Ordering {
    fn create(self, seed: u64) -> Box<dyn OrderingAlgorithm> {
        match self {
            Self::MinFill => Box::new(MinFillOrdering),
            Self::MinDegree => Box::new(MinDegreeOrdering),
            Self::Natural => Box::new(NaturalOrdering),
            Self::MaximumCardinalitySearch => Box::new(MaximumCardinalitySearchOrdering::with_selection(
                Box::new(RandomVertexSelection::new(1, seed)),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DecompositionType {
    Tree,
    Path,
    Hypertree,
}

impl FromStr for DecompositionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree" => Ok(Self::Tree),
            "path" => Ok(Self::Path),
            "hypertree" => Ok(Self::Hypertree),
            _ => Err(format!("unknown decomposition type `{}`", s)),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "htd-cli",
    about = "Computes heuristic tree, path and hypertree decompositions of a given input graph."
)]
struct Opt {
    /// Input file. `stdin` if not specified.
    #[structopt(parse(from_os_str))]
    input: Option<PathBuf>,

    /// Output file. `stdout` if not specified.
    #[structopt(parse(from_os_str))]
    output: Option<PathBuf>,

    /// Input format: `pace` (p tw n m) or `hgr` (p htd n m).
    #[structopt(short, long, default_value = "pace")]
    format: InputFormat,

    /// Elimination ordering: min-fill, min-degree, natural or mcs.
    #[structopt(short, long, default_value = "min-fill")]
    ordering: Ordering,

    /// Decomposition type: tree, path or hypertree.
    #[structopt(short, long, default_value = "tree")]
    decomposition: DecompositionType,

    /// Seed for randomized choices.
    #[structopt(long, default_value = "0")]
    seed: u64,

    /// Remove redundant bags after all other operations.
    #[structopt(long)]
    compress: bool,

    /// Make all join nodes binary with identical child bags.
    #[structopt(long)]
    join: bool,

    /// Produce a nice tree decomposition.
    #[structopt(long)]
    normalize: bool,

    /// Add an empty root bag.
    #[structopt(long)]
    empty_root: bool,

    /// Add empty leaf bags.
    #[structopt(long)]
    empty_leaves: bool,

    /// Stop after the given number of seconds.
    #[structopt(short, long)]
    timeout: Option<u64>,

    /// Verbosity, repeat for more output.
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

impl Opt {
    fn operations(&self) -> Vec<Box<dyn ManipulationOperation>> {
        let mut operations: Vec<Box<dyn ManipulationOperation>> = Vec::new();
        if self.normalize {
            operations.push(Box::new(
                NormalizationOperation::new()
                    .empty_root(self.empty_root)
                    .empty_leaves(self.empty_leaves),
            ));
        } else {
            if self.join {
                operations.push(Box::new(JoinNodeReplacementOperation));
            }
            if self.empty_root {
                operations.push(Box::new(AddEmptyRootOperation));
            }
            if self.empty_leaves {
                operations.push(Box::new(AddEmptyLeavesOperation));
            }
        }
        if self.compress {
            operations.push(Box::new(CompressionOperation));
        }
        operations
    }
}

fn read<T: BufRead>(format: InputFormat, reader: T) -> io::Result<MultiHypergraph> {
    match format {
        InputFormat::Pace => MultiHypergraph::try_from(PaceReader(reader)),
        InputFormat::Hgr => MultiHypergraph::try_from(HgrReader(reader)),
    }
}

fn cancelled() -> io::Error {
    io::Error::new(ErrorKind::Interrupted, "computation cancelled")
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();
    build_pace_logger(level_for_verbosity(opt.verbose));

    let token = CancellationToken::new();
    #[cfg(feature = "handle-ctrlc")]
    htd::signals::initialize(token.clone()).map_err(|e| io::Error::new(ErrorKind::Other, e))?;
    if let Some(seconds) = opt.timeout {
        initialize_timeout(token.clone(), Duration::from_secs(seconds))?;
    }

    let graph = match &opt.input {
        Some(path) => read(opt.format, BufReader::new(File::open(path)?))?,
        None => read(opt.format, stdin().lock())?,
    };
    info!(
        "read graph with {} vertices and {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );

    let mut factory = AlgorithmFactory::new();
    let (ordering, seed) = (opt.ordering, opt.seed);
    factory.set_ordering_template(move |_| ordering.create(seed));
    if let DecompositionType::Path = opt.decomposition {
        factory.set_tree_decomposition_template(|factory| {
            Box::new(PathDecompositionAlgorithm::new(Box::new(
                BucketEliminationTreeDecompositionAlgorithm::new(factory.create_ordering_algorithm()),
            )))
        });
    }

    let operations = opt.operations();
    let invalid = |e: htd::Error| io::Error::new(ErrorKind::InvalidInput, e.to_string());
    let td: TreeDecomposition = match opt.decomposition {
        DecompositionType::Tree | DecompositionType::Path => factory
            .create_tree_decomposition_algorithm()
            .compute_decomposition(&graph, &operations, &token)
            .map_err(invalid)?
            .ok_or_else(cancelled)?,
        DecompositionType::Hypertree => {
            let htd = HypertreeDecompositionAlgorithm::new(factory.create_tree_decomposition_algorithm())
                .compute_decomposition(&graph, &operations, &token)
                .map_err(invalid)?
                .ok_or_else(cancelled)?;
            info!("hypertree width {}", htd.hypertree_width());
            htd.into_tree_decomposition()
        }
    };

    if let Err(e) = td.verify(&graph) {
        warn!("decomposition is invalid: {}", e);
    }
    info!("width {} with {} bags", td.width(), td.nodes().len());

    match &opt.output {
        Some(path) => {
            let writer = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            TdWriter::new(&td, &graph, writer).output()
        }
        None => TdWriter::new(&td, &graph, stdout()).output(),
    }
}
