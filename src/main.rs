use anyhow::Context;
use categorize::Categorizer;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Table};
use config::RulesConfig;
use data::Ledger;
use env_logger::Env;
use flow::{build_aggregated_flow_graph, build_flow_graph, FlowGraph};
use log::warn;
use read::{read_ledger, CategoryPolicy};
use rust_decimal::Decimal;
use session::{NewEntry, Session, DEFAULT_FILENAME};
use std::path::{Path, PathBuf};
use write::write_flow_graph;

mod categorize;
mod config;
mod data;
mod flow;
mod read;
mod session;
mod write;

#[derive(Parser)]
#[clap(author, version, about = "Categorize bank transactions and show where the budget goes")]
#[clap(propagate_version = true)]
struct Cli {
    /// TOML file replacing the built-in keyword rules
    #[clap(long, global = true)]
    rules: Option<PathBuf>,

    /// Keep non-empty Category values found in the input instead of recomputing them
    #[clap(long, global = true)]
    keep_categories: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the category a description falls into
    Categorize { text: String },
    /// Print the categorized ledger and its flow edges
    Show {
        file: PathBuf,
        /// One edge per category instead of one per transaction
        #[clap(long)]
        aggregate: bool,
    },
    /// Print the flow graph as Sankey JSON
    Flow {
        file: PathBuf,
        #[clap(long)]
        aggregate: bool,
    },
    /// Append a manual entry and save the ledger
    Add {
        file: PathBuf,
        #[clap(long)]
        description: String,
        #[clap(long, allow_hyphen_values = true)]
        amount: Decimal,
        /// YYYY-MM-DD
        #[clap(long)]
        date: Option<NaiveDate>,
        /// Defaults to what the rules say
        #[clap(long)]
        category: Option<String>,
        #[clap(long, short, default_value = DEFAULT_FILENAME)]
        output: PathBuf,
    },
    /// Save the categorized ledger
    Save {
        file: PathBuf,
        #[clap(long, short, default_value = DEFAULT_FILENAME)]
        output: PathBuf,
    },
}

fn load(path: &Path, categorizer: &Categorizer, policy: CategoryPolicy) -> anyhow::Result<Ledger> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let ledger = read_ledger(file, categorizer, policy)
        .with_context(|| format!("reading {}", path.display()))?;
    if ledger.is_empty() {
        warn!("{} has no transactions", path.display());
    }
    Ok(ledger)
}

fn print_ledger(ledger: &Ledger, graph: &FlowGraph) {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Amount", "Category"]);
    for tx in ledger.iter() {
        table.add_row(vec![
            Cell::new(tx.date.map(|d| d.to_string()).unwrap_or_default()),
            Cell::new(&tx.description),
            Cell::new(tx.amount).set_alignment(CellAlignment::Right),
            Cell::new(&tx.category),
        ]);
    }
    println!("{table}");

    let mut flows = Table::new();
    flows.set_header(vec!["Source", "Target", "Weight"]);
    for edge in graph.edges() {
        flows.add_row(vec![
            Cell::new(&edge.source),
            Cell::new(&edge.target),
            Cell::new(edge.weight).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{flows}");
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let categorizer = match &cli.rules {
        Some(path) => RulesConfig::load_from_file(path)?.into_categorizer(),
        None => Categorizer::default(),
    };
    let policy = if cli.keep_categories {
        CategoryPolicy::KeepStored
    } else {
        CategoryPolicy::Recompute
    };
    let flow_graph = |ledger: &Ledger, aggregate: bool| {
        if aggregate {
            build_aggregated_flow_graph(ledger)
        } else {
            build_flow_graph(ledger)
        }
    };

    match cli.command {
        Command::Categorize { text } => println!("{}", categorizer.categorize(&text)),
        Command::Show { file, aggregate } => {
            let ledger = load(&file, &categorizer, policy)?;
            print_ledger(&ledger, &flow_graph(&ledger, aggregate));
        }
        Command::Flow { file, aggregate } => {
            let ledger = load(&file, &categorizer, policy)?;
            write_flow_graph(std::io::stdout(), &flow_graph(&ledger, aggregate))?;
        }
        Command::Add {
            file,
            description,
            amount,
            date,
            category,
            output,
        } => {
            let ledger = load(&file, &categorizer, policy)?;
            let mut session = Session::new(ledger, categorizer);
            session.add_entry(NewEntry {
                date,
                description,
                amount,
                category,
            });
            session.save(&output)?;
            print_ledger(session.ledger(), &build_flow_graph(session.ledger()));
        }
        Command::Save { file, output } => {
            let ledger = load(&file, &categorizer, policy)?;
            Session::new(ledger, categorizer).save(&output)?;
        }
    }
    Ok(())
}
