use crate::config::{CliConfig, EngineConfig};
use crate::library::{arith, sexp};
use crate::machine::{Command, Control, ControlSnapshot, Domain, Outcome};
use crate::stepper::{self, Machine, MachineSnapshot, RunState};
use crate::tree::{ExecutionTree, NodeId, TreeSnapshot, TreeState};
use anyhow::{bail, Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "derive")]
#[command(about = "Derive - step-by-step interactive derivations", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides ./derive.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Evaluator to drive the derivation with
    #[arg(long, value_enum, global = true, default_value = "tree")]
    pub evaluator: Evaluator,

    /// Print the result as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Evaluator {
    /// Execution tree with a full derivation record
    Tree,
    /// Continuation-stack machine
    Stack,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive fib(n) by choosing the defining case of every call
    Fib {
        n: u64,

        /// Case label for the next pause point (repeatable)
        #[arg(long = "choose")]
        choose: Vec<String>,
    },

    /// Build an S-expression from menus and typed-in names
    Sexp {
        /// Menu label for the next pause point (repeatable)
        #[arg(long = "choose")]
        choose: Vec<String>,

        /// Text answer for the next request (repeatable)
        #[arg(long = "respond")]
        respond: Vec<String>,
    },

    /// Print the resolved configuration as TOML
    Config,
}

/// Run the CLI by parsing process arguments
pub fn run_cli() -> Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    run_cli_with_args(cli, &matches)
}

/// Run the CLI with provided arguments
pub fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let matches = Cli::command().try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;
    run_cli_with_args(cli, &matches)
}

fn run_cli_with_args(cli: Cli, matches: &ArgMatches) -> Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration before running anything so config errors surface first
    let config = CliConfig::load(cli.config.as_deref())?;
    init_tracing(&config.log_filter);
    debug!(?config, "configuration resolved");

    let report = match cli.command {
        Commands::Fib { n, choose } => {
            let control = Control::apply(&arith::fib(), vec![arith::nat(n)]);
            let script = choose.into_iter().map(Command::<arith::Arith>::Choice).collect();
            drive(control, script, cli.evaluator, config.engine)?
        }

        Commands::Sexp { .. } => {
            let Some(("sexp", sub)) = matches.subcommand() else {
                bail!("Missing sexp arguments");
            };
            drive(sexp::term(), sexp_script(sub), cli.evaluator, config.engine)?
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
            return Ok(());
        }
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to render report")?
        );
    } else {
        print!("{report}");
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed when the CLI is embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Interleave `--choose` and `--respond` in command-line order
fn sexp_script(matches: &ArgMatches) -> Vec<Command<sexp::Sexp>> {
    let mut script: Vec<(usize, Command<sexp::Sexp>)> = Vec::new();

    if let (Some(values), Some(indices)) = (
        matches.get_many::<String>("choose"),
        matches.indices_of("choose"),
    ) {
        script.extend(indices.zip(values.map(|label| Command::choose(label.as_str()))));
    }
    if let (Some(values), Some(indices)) = (
        matches.get_many::<String>("respond"),
        matches.indices_of("respond"),
    ) {
        script.extend(
            indices.zip(values.map(|text| Command::respond(sexp::Term::Str(text.clone())))),
        );
    }

    script.sort_by_key(|(index, _)| *index);
    script.into_iter().map(|(_, command)| command).collect()
}

/* ===================== Reports ===================== */

/// What a run ended with
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    Finished {
        outcome: ControlSnapshot,
        steps: u64,
    },
    PausedTree {
        at: NodeId,
        tree: TreeSnapshot,
        steps: u64,
    },
    PausedMachine {
        machine: MachineSnapshot,
        steps: u64,
    },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Finished { outcome, steps } => {
                writeln!(f, "{outcome}")?;
                writeln!(f, "({steps} steps)")
            }
            Report::PausedTree { at, tree, steps } => {
                write!(f, "{tree}")?;
                writeln!(f, "paused at {at} after {steps} steps")
            }
            Report::PausedMachine { machine, steps } => {
                write!(f, "{machine}")?;
                writeln!(f, "paused after {steps} steps")
            }
        }
    }
}

/// Run `control` with the script on the selected evaluator
pub fn drive<D: Domain>(
    control: Control<D>,
    script: Vec<Command<D>>,
    evaluator: Evaluator,
    engine: EngineConfig,
) -> Result<Report> {
    match evaluator {
        Evaluator::Tree => {
            let mut tree = ExecutionTree::with_config(control, engine);
            let state = tree.run_script(script).context("Derivation failed")?;
            let steps = tree.steps();
            match state {
                TreeState::Finished => {
                    let outcome = tree.outcome().context("Tree finished without an outcome")?;
                    Ok(finished::<D>(outcome, steps))
                }
                TreeState::Paused(at) => Ok(Report::PausedTree {
                    at,
                    tree: tree.snapshot(),
                    steps,
                }),
                TreeState::Running => bail!("Tree stopped while still running"),
            }
        }

        Evaluator::Stack => {
            let mut machine = Machine::with_config(control, engine);
            let state = stepper::run_script(&mut machine, script).context("Derivation failed")?;
            let steps = machine.steps();
            match state {
                RunState::Halted | RunState::Failed => {
                    let outcome = machine
                        .outcome()
                        .context("Machine stopped without an outcome")?;
                    Ok(finished::<D>(&outcome, steps))
                }
                RunState::Paused => Ok(Report::PausedMachine {
                    machine: machine.snapshot(),
                    steps,
                }),
                RunState::Running => bail!("Machine stopped while still running"),
            }
        }
    }
}

fn finished<D: Domain>(outcome: &Outcome<D>, steps: u64) -> Report {
    Report::Finished {
        outcome: ControlSnapshot::of_outcome::<D>(outcome),
        steps,
    }
}
