//! Computes a feedback vertex set with the greedy splitting heuristic and reports the simple
//! cycles before and after removing it.
//!
//! The graph is read from a metis file (`-f`), an edge list (`-e`) or generated at random.
//! Counting cycles can take very long, each count runs in its own thread and is interrupted after
//! `--timeout` seconds or on Ctrl-C.

use std::env;
use std::error;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use clap::{Arg, Command};
use itertools::Itertools;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fvs_greedy::{compute_feedback_vertex_set, Graph, ProcessingError, Vertex, random::random_digraph};

/// How often the main thread checks for timeouts and Ctrl-C while cycles are counted.
const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// At most this many residual cycles are printed by `--list-cycles`.
const LIST_LIMIT: usize = 50;

struct Options {
    timeout: Option<Duration>,
    count_cycles: bool,
    list_cycles: bool,
    out: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FVS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "fvs_greedy=debug,fvs=debug,info"
        } else {
            "fvs_greedy=info,fvs=info,warn"
        })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}

pub fn main() -> Result<(), Box<dyn error::Error>> {
    init_tracing();
    let m = Command::new("fvs")
        .about("Greedy feedback vertex set for directed graphs")
        .arg(Arg::new("file")
             .help("Graph in metis format")
             .takes_value(true)
             .short('f')
             .long("file")
             .conflicts_with("edges"))
        .arg(Arg::new("edges")
             .help("Graph as edge list, one `u v`, `u -> v` or `u,v` per line")
             .takes_value(true)
             .short('e')
             .long("edges"))
        .arg(Arg::new("nodes")
             .help("Number of vertices of a random graph")
             .takes_value(true)
             .short('n')
             .long("nodes")
             .default_value("100"))
        .arg(Arg::new("edges-count")
             .help("Number of edges of a random graph [default: 2 * nodes]")
             .takes_value(true)
             .short('m')
             .long("edges-count"))
        .arg(Arg::new("seed")
             .help("Seed of a random graph")
             .takes_value(true)
             .short('s')
             .long("seed"))
        .arg(Arg::new("timeout")
             .help("Time limit in seconds for each cycle count")
             .takes_value(true)
             .short('t')
             .long("timeout"))
        .arg(Arg::new("no-cycles")
             .help("Skip counting cycles")
             .long("no-cycles"))
        .arg(Arg::new("list-cycles")
             .help("Print the cycles that remain after removing the feedback vertex set")
             .long("list-cycles"))
        .arg(Arg::new("out")
             .help("Write the graph without the feedback vertex set in metis format")
             .takes_value(true)
             .short('o')
             .long("out"))
        .get_matches();

    let opts = Options {
        timeout: m.value_of("timeout").map(str::parse::<u64>).transpose()?.map(Duration::from_secs),
        count_cycles: !m.is_present("no-cycles"),
        list_cycles: m.is_present("list-cycles"),
        out: m.value_of("out").map(PathBuf::from),
    };

    // The first Ctrl-C interrupts a running cycle count, the second one exits.
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
    })?;

    if let Some(path) = m.value_of("file") {
        let graph = Graph::read_graph(BufReader::new(File::open(path)?))?;
        info!(path, vertices = graph.num_vertices(), edges = graph.num_edges(), "read metis graph");
        run(graph, &opts, &interrupted)
    } else if let Some(path) = m.value_of("edges") {
        let graph = Graph::read_edge_list(BufReader::new(File::open(path)?))?;
        info!(path, vertices = graph.num_vertices(), edges = graph.num_edges(), "read edge list");
        run(graph, &opts, &interrupted)
    } else {
        let nodes: usize = m.value_of_t("nodes")?;
        let edges = match m.value_of("edges-count") {
            Some(count) => count.parse::<usize>()?,
            None => 2 * nodes,
        };
        let seed = match m.value_of("seed") {
            Some(seed) => seed.parse::<u64>()?,
            None => rand::random(),
        };
        info!(nodes, edges, seed, "generating random graph");
        let graph = random_digraph(nodes, edges, &mut StdRng::seed_from_u64(seed));
        run(graph, &opts, &interrupted)
    }
}

fn run<V>(graph: Graph<V>, opts: &Options, interrupted: &AtomicBool) -> Result<(), Box<dyn error::Error>>
where
    V: Vertex + Display + Send + Sync + 'static,
{
    if opts.count_cycles {
        let before = count_cycles(&graph, opts.timeout, interrupted)?;
        println!("Cycles before: {}", format_count(before));
    }

    let sccs = graph.decompose();
    println!("Strongly connected components: {}", sccs.len());
    for scc in sccs.iter().filter(|scc| scc.len() > 1) {
        println!("  [{}]", scc.iter().join(", "));
    }

    let fvs = compute_feedback_vertex_set(&graph);
    println!("Feedback vertex set ({}): [{}]", fvs.len(), fvs.iter().join(", "));

    let residual = graph.remove_vertices(&fvs)?;
    if opts.count_cycles {
        let after = count_cycles(&residual, opts.timeout, interrupted)?;
        println!("Cycles after: {}", format_count(after));
    }
    // Without self-loops a graph is acyclic iff every component is a single vertex.
    if residual.component_count() == residual.num_vertices() {
        println!("All cycles have been removed");
    } else if opts.list_cycles {
        for cycle in residual.simple_cycles().take(LIST_LIMIT) {
            println!("  {}", cycle.iter().join(" -> "));
        }
    }

    if let Some(path) = &opts.out {
        residual.write_graph(BufWriter::new(File::create(path)?))?;
        info!(path = %path.display(), "wrote residual graph");
    }
    Ok(())
}

/// Counts the simple cycles of `graph` in a worker thread. The count is interrupted once
/// `timeout` elapsed or `interrupted` gets set while it runs.
fn count_cycles<V>(graph: &Graph<V>, timeout: Option<Duration>, interrupted: &AtomicBool)
    -> Result<Result<usize, ProcessingError>, Box<dyn error::Error>>
where
    V: Vertex + Send + Sync + 'static,
{
    // A Ctrl-C that arrived before this count belongs to an earlier step.
    interrupted.store(false, Ordering::SeqCst);
    let (interrupt_sender, interrupt_receiver) = channel();
    let (done_sender, done_receiver) = channel();
    let g = graph.clone();
    let handle = thread::spawn(move || {
        let count = g.count_simple_cycles_interruptible(&interrupt_receiver);
        // The main thread may not listen anymore.
        done_sender.send(1u8).ok();
        count
    });
    let start = Instant::now();
    let mut interrupt_sent = false;
    loop {
        match done_receiver.recv_timeout(POLL_INTERVAL) {
            Ok(_) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => (),
        }
        let out_of_time = timeout.map_or(false, |limit| start.elapsed() >= limit);
        if !interrupt_sent && (out_of_time || interrupted.load(Ordering::SeqCst)) {
            warn!(elapsed = ?start.elapsed(), "interrupting cycle count");
            // Fails only if the worker just finished.
            interrupt_sender.send(1u8).ok();
            interrupt_sent = true;
        }
    }
    // A Ctrl-C only stops the count that was running.
    interrupted.store(false, Ordering::SeqCst);
    handle.join().map_err(|_| "cycle counting thread panicked".into())
}

fn format_count(count: Result<usize, ProcessingError>) -> String {
    match count {
        Ok(count) => count.to_string(),
        Err(ProcessingError::OutOfTime { counted }) => format!("at least {} (interrupted)", counted),
    }
}
