mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wotrack",
    about = "Search, review and update work orders kept in a spreadsheet",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .wotrack/)
    #[arg(long, global = true, env = "WOTRACK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .wotrack/config.yaml (and a local workbook unless --sheets-url is given)
    Init {
        /// Google Sheets URL or spreadsheet id to use instead of the local workbook
        #[arg(long)]
        sheets_url: Option<String>,

        /// Project name (default: the root directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Look up a work order and show its edit defaults
    Show {
        /// Work order number, e.g. 1200 or WO-867
        query: String,
    },

    /// Change the status and/or assignee of a work order
    Update {
        /// Work order number, e.g. 1200 or WO-867
        query: String,

        /// New status (default: keep the current selection)
        #[arg(long)]
        status: Option<String>,

        /// Reassign to this person (default: keep the current selection)
        #[arg(long = "assign", value_name = "NAME")]
        assigned_to: Option<String>,
    },

    /// List pending, in-progress and unassigned work orders
    Active,

    /// Show the assignee options built from the staff roster
    Roster,

    /// Inspect and validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the JSON API
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "8501")]
        port: u16,

        /// Don't open a browser
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { sheets_url, name } => {
            cmd::init::run(&root, sheets_url.as_deref(), name.as_deref(), cli.json)
        }
        Commands::Show { query } => cmd::show::run(&root, &query, cli.json),
        Commands::Update {
            query,
            status,
            assigned_to,
        } => cmd::update::run(&root, &query, status, assigned_to, cli.json),
        Commands::Active => cmd::active::run(&root, cli.json),
        Commands::Roster => cmd::roster::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Serve { port, no_open } => cmd::serve::run(&root, port, no_open),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
