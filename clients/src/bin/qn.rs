//! `qn`: evaluates, encodes, and decodes Quantum Number values.
//!
//! **Subcommands:**
//! - `qn eval <FILE|->` resolves a JSON expression tree
//! - `qn encode <VALUE>` prints the 64-hex-digit layout of a unit
//! - `qn decode <HEX>` verifies and prints a unit
//!
//! **Expression JSON:**
//! ```text
//! {"int": 1}  {"ratio": [1, 3]}  {"complex": [3, 4]}  {"unit": "{a=1, c=-2}"}
//! {"var": "x"}
//! {"op": {"kind": "add", "args": [<expr>, <expr>]}}
//! {"func": {"kind": "abs", "arg": <expr>}}
//! ```
//!
//! **Usage:**
//! ```text
//! qn eval expr.json --bind x=41 --simplify --trace
//! echo '{"int": -7}' | qn eval - --hex
//! qn encode 3+4i
//! qn decode 0300000000000000000000000000000000000000000400000000000000000070
//! ```
//!
//! Exits non-zero on any evaluation, parse, or integrity failure.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quantum_number::{AtomicUnit, Bindings, Engine, FunctionKind, Node, OperationKind};
use serde::Deserialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Quantum Number command-line client.
#[derive(Parser)]
#[command(name = "qn", about = "Evaluate, encode, and decode Quantum Number values")]
struct Args {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a JSON expression tree.
    Eval {
        /// Expression file, or `-` for standard input.
        input: PathBuf,

        /// Bind a variable, e.g. `x=41` or `r=1/3`.
        #[arg(long = "bind", value_name = "NAME=VALUE", value_parser = parse_binding)]
        bindings: Vec<(String, AtomicUnit)>,

        /// Simplify the tree before resolving it.
        #[arg(long)]
        simplify: bool,

        /// Print the derivation after the value.
        #[arg(long)]
        trace: bool,

        /// Print the value as its 64-hex-digit layout.
        #[arg(long)]
        hex: bool,
    },
    /// Print the 64-hex-digit layout of a unit given in text form.
    Encode {
        /// Unit text, e.g. `-42`, `3/6`, `3+4i`, `{a=1, c=-2}`.
        value: String,
    },
    /// Verify a 64-hex-digit layout and print the unit.
    Decode {
        /// The layout, byte 0 first.
        hex: String,
    },
}

/// JSON form of an expression tree.
#[derive(Deserialize)]
#[serde(rename_all = "lowercase", deny_unknown_fields)]
enum ExprSpec {
    Int(i64),
    Ratio(i64, i64),
    Complex(i64, i64),
    Unit(String),
    Var(String),
    Op {
        kind: OperationKind,
        args: Vec<ExprSpec>,
    },
    Func {
        kind: FunctionKind,
        arg: Box<ExprSpec>,
    },
}

impl ExprSpec {
    fn into_node(self) -> Result<Node> {
        let node = match self {
            Self::Int(n) => Node::leaf(n),
            Self::Ratio(n, d) => Node::leaf(AtomicUnit::from_ratio(n, d)),
            Self::Complex(re, im) => Node::leaf(AtomicUnit::complex(re, im)),
            Self::Unit(text) => Node::leaf(text.parse::<AtomicUnit>()?),
            Self::Var(name) => Node::variable(name),
            Self::Op { kind, args } => {
                let children = args
                    .into_iter()
                    .map(Self::into_node)
                    .collect::<Result<Vec<_>>>()?;
                Node::operation(kind, children)?
            }
            Self::Func { kind, arg } => Node::function(kind, arg.into_node()?),
        };
        Ok(node)
    }
}

fn parse_binding(text: &str) -> std::result::Result<(String, AtomicUnit), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{text}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("variable name is empty".to_string());
    }
    let value = value.parse::<AtomicUnit>().map_err(|e| e.to_string())?;
    Ok((name.to_string(), value))
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read expression from standard input")?;
        return Ok(text);
    }
    fs::read_to_string(input)
        .with_context(|| format!("Failed to read expression file: {}", input.display()))
}

fn print_unit(unit: AtomicUnit, hex: bool) {
    if hex {
        println!("{}", unit.to_hex());
    } else {
        println!("{unit}");
    }
}

fn eval(
    input: &Path,
    bindings: Vec<(String, AtomicUnit)>,
    simplify: bool,
    trace: bool,
    hex: bool,
) -> Result<()> {
    let text = read_input(input)?;
    let spec: ExprSpec = serde_json::from_str(&text).context("Invalid expression JSON")?;
    let tree = spec.into_node()?;
    let bindings: Bindings = bindings.into_iter().collect();
    tracing::info!(nodes = tree.node_count(), bindings = bindings.len(), "expression loaded");

    let mut engine = Engine::new()
        .with_bindings(&bindings)
        .simplify_first(simplify);
    if trace {
        let (value, derivation) = engine.trace(&tree)?;
        print_unit(value, hex);
        println!();
        println!("{derivation}");
    } else {
        print_unit(engine.quantition(&tree)?, hex);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match args.command {
        Command::Eval {
            input,
            bindings,
            simplify,
            trace,
            hex,
        } => eval(&input, bindings, simplify, trace, hex),
        Command::Encode { value } => {
            let unit: AtomicUnit = value.parse()?;
            println!("{}", unit.to_hex());
            Ok(())
        }
        Command::Decode { hex } => {
            let unit = AtomicUnit::from_hex(&hex).context("Decode FAILED")?;
            println!("{unit}");
            Ok(())
        }
    }
}
