use crate::graph::{HypergraphView, MultiHypergraph, MutableHypergraph, Vertex};
use crate::tree_decomposition::{Decomposition, NodeId};
use fxhash::FxHashMap;
use std::convert::TryFrom;
use std::io;
use std::io::{BufRead, ErrorKind, Write};

fn invalid_input<E: ToString>(error: E) -> io::Error {
    io::Error::new(ErrorKind::InvalidInput, error.to_string())
}

fn parse_numbers(line: &str) -> io::Result<Vec<usize>> {
    line.split_whitespace()
        .map(|s| s.parse::<usize>().map_err(invalid_input))
        .collect()
}

/// Parses `p <format> <n> <m>` and returns `(n, m)`.
fn problem_line(line: &str, format: &str) -> io::Result<(usize, usize)> {
    let mut tokens = line.split_whitespace().skip(1);
    if tokens.next() != Some(format) {
        return Err(invalid_input(format!("expected `p {} n m`", format)));
    }
    let nums = parse_numbers(&tokens.collect::<Vec<_>>().join(" "))?;
    match nums.as_slice() {
        [n, m] => Ok((*n, *m)),
        _ => Err(invalid_input("Invalid line")),
    }
}

fn check_vertices(vertices: &[Vertex], n: usize) -> io::Result<()> {
    match vertices.iter().find(|v| **v == 0 || **v > n) {
        Some(v) => Err(invalid_input(format!("vertex {} out of range", v))),
        None => Ok(()),
    }
}

/// Reader for graphs in the PACE `tw` format: a `p tw n m` line followed by
/// one `u v` line per edge, `c` lines are comments.
pub struct PaceReader<T: BufRead>(pub T);

impl<T: BufRead> TryFrom<PaceReader<T>> for MultiHypergraph {
    type Error = io::Error;

    fn try_from(reader: PaceReader<T>) -> Result<Self, Self::Error> {
        let reader = reader.0;
        let mut graph: Option<(MultiHypergraph, usize)> = None;
        for line in reader.lines() {
            let line = line?;
            match line.chars().next() {
                None | Some('c') => {}
                Some('p') => {
                    let (n, _) = problem_line(&line, "tw")?;
                    graph = Some((MultiHypergraph::with_vertices(n), n));
                }
                _ => {
                    let (graph, n) = graph.as_mut().ok_or_else(|| invalid_input("missing p line"))?;
                    let nums = parse_numbers(&line)?;
                    let (u, v) = match nums.as_slice() {
                        [u, v] => (*u, *v),
                        _ => return Err(invalid_input("Invalid line")),
                    };
                    check_vertices(&[u, v], *n)?;
                    if u != v {
                        graph.add_edge(u, v).map_err(invalid_input)?;
                    }
                }
            }
        }
        graph
            .map(|(graph, _)| graph)
            .ok_or_else(|| invalid_input("missing p line"))
    }
}

/// Reader for hypergraphs: a `p htd n m` line followed by one hyperedge per
/// line, given as whitespace separated vertex ids, `c` lines are comments.
pub struct HgrReader<T: BufRead>(pub T);

impl<T: BufRead> TryFrom<HgrReader<T>> for MultiHypergraph {
    type Error = io::Error;

    fn try_from(reader: HgrReader<T>) -> Result<Self, Self::Error> {
        let reader = reader.0;
        let mut graph: Option<(MultiHypergraph, usize)> = None;
        for line in reader.lines() {
            let line = line?;
            match line.trim_start().chars().next() {
                None | Some('c') => {}
                Some('p') => {
                    let (n, _) = problem_line(&line, "htd")?;
                    graph = Some((MultiHypergraph::with_vertices(n), n));
                }
                _ => {
                    let (graph, n) = graph.as_mut().ok_or_else(|| invalid_input("missing p line"))?;
                    let elements = parse_numbers(&line)?;
                    check_vertices(&elements, *n)?;
                    graph.add_hyperedge(elements).map_err(invalid_input)?;
                }
            }
        }
        graph
            .map(|(graph, _)| graph)
            .ok_or_else(|| invalid_input("missing p line"))
    }
}

/// Writes a decomposition in the PACE `td` format. Nodes are numbered from 1
/// in pre-order.
pub struct TdWriter<'a, 'b, W: Write> {
    td: &'a dyn Decomposition,
    graph: &'b dyn HypergraphView,
    writer: W,
}

impl<'a, 'b, W: Write> TdWriter<'a, 'b, W> {
    pub fn new(td: &'a dyn Decomposition, graph: &'b dyn HypergraphView, writer: W) -> Self {
        Self { td, graph, writer }
    }

    pub fn output(&mut self) -> io::Result<()> {
        let nodes = self.td.nodes();
        let index: FxHashMap<NodeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (*n, i + 1))
            .collect();

        writeln!(
            self.writer,
            "s td {} {} {}",
            nodes.len(),
            self.td.maximum_bag_size(),
            self.graph.vertex_count()
        )?;
        for (i, node) in nodes.iter().enumerate() {
            write!(self.writer, "b {}", i + 1)?;
            for v in self.td.bag_content(*node) {
                write!(self.writer, " {}", v)?;
            }
            writeln!(self.writer)?;
        }
        for node in nodes.iter().copied() {
            for child in self.td.children(node) {
                writeln!(self.writer, "{} {}", index[&node], index[child])?;
            }
        }
        self.writer.flush()
    }
}
