//! Replica - CLI
//!
//! Builds sample value graphs, deep-copies them and prints what happened.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use replica_core::{CopyConfig, DeepCopier, Value, VisitedMap};
use replica_models::{Address, ExternalHandle, Man, Node, Person};

#[derive(Parser)]
#[command(name = "replica")]
#[command(about = "Cycle-safe deep copy demonstrations")]
struct Cli {
    /// Abort a copy after materialising this many containers and records
    #[arg(long, global = true)]
    max_nodes: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy each sample graph and print the result
    Demo,
    /// Copy a linked chain of nodes
    Chain {
        /// Number of nodes
        #[arg(long, default_value_t = 1_000_000)]
        length: usize,
        /// Link the last node back to the first
        #[arg(long)]
        ring: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = CopyConfig::default();
    if let Some(limit) = cli.max_nodes {
        config = config.with_max_nodes(limit);
    }

    match cli.command {
        Commands::Demo => run_demo(&config),
        Commands::Chain { length, ring } => run_chain(&config, length, ring),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn samples() -> Vec<(&'static str, Value)> {
    let cycle = {
        let node1 = Node::new(1);
        let node2 = Node::new(2);
        Node::link(&node1, &node2);
        Node::link(&node2, &node1);
        node1
    };

    vec![
        ("man", Man::new("Arsen", 30, &["Kotlin in Action", "Effective Java"])),
        (
            "person",
            Person::new("Arsen", 33, Address::new("Yerevan", "0014"), &["Developer", "Engineer"]),
        ),
        ("cycle", cycle),
        ("list", Value::list([Value::str("Kotlin"), Value::str("Java")])),
        ("set", Value::set([Value::Int(1), Value::Int(2), Value::Int(3)])),
        (
            "map",
            Value::map([
                (Value::str("key1"), Value::Int(100)),
                (Value::str("key2"), Value::Int(200)),
            ]),
        ),
        ("array", Value::array([Value::str("A"), Value::str("B"), Value::str("C")])),
        ("unsupported", ExternalHandle::new("no_primary_constructor")),
    ]
}

fn run_demo(config: &CopyConfig) -> Result<()> {
    for (name, original) in samples() {
        let mut visited = VisitedMap::with_capacity(config.visited_capacity);
        let mut copier = DeepCopier::new(config.clone(), &mut visited);

        match copier.copy(&original) {
            Ok(copy) => {
                println!("{name}: {copy:?}");
                println!(
                    "  equal: {}, same instance: {}",
                    copy == original,
                    copy.same(&original)
                );
                println!("  {}", copier.report());
                if name == "cycle" {
                    let back = Node::nth(&copy, 2).context("cycle copy lost its links")?;
                    println!("  copy.next.next is copy: {}", back.same(&copy));
                    Node::dismantle(&copy);
                }
            }
            Err(err) => {
                tracing::warn!(sample = name, %err, "copy rejected");
                println!("{name}: error: {err}");
            }
        }

        if name == "cycle" {
            Node::dismantle(&original);
        }
    }
    Ok(())
}

fn run_chain(config: &CopyConfig, length: usize, ring: bool) -> Result<()> {
    let head = if ring { Node::ring(length) } else { Node::chain(length) };
    tracing::info!(length, ring, "chain built");
    let outcome = copy_chain(config, &head, length, ring);
    Node::dismantle(&head);
    outcome
}

fn copy_chain(config: &CopyConfig, head: &Value, length: usize, ring: bool) -> Result<()> {
    let mut visited = VisitedMap::with_capacity(length.min(1 << 20));
    let mut copier = DeepCopier::new(config.clone(), &mut visited);
    let copied = copier
        .copy(head)
        .with_context(|| format!("copying a {length}-node chain"))?;
    let report = copier.report();

    let verdict = verify_chain(&copied, length, ring);
    Node::dismantle(&copied);
    verdict?;

    println!("copied {length} nodes{}", if ring { " (ring)" } else { "" });
    println!("{report}");
    Ok(())
}

fn verify_chain(copied: &Value, length: usize, ring: bool) -> Result<()> {
    let copied_len = Node::values(copied).len();
    if copied_len != length {
        bail!("copy has {copied_len} nodes, expected {length}");
    }
    if ring && length > 0 {
        let back = Node::nth(copied, length).context("ring copy lost its links")?;
        if !back.same(copied) {
            bail!("ring copy does not close on its own head");
        }
    }
    Ok(())
}
