//! wiscar CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(
    name = "wiscar",
    version,
    about = "WISCAR career-readiness self-assessment"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an assessment interactively
    Take {
        /// Question bank TOML (defaults to `default_bank` from the config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Export format: json, html, svg, markdown, all (comma-separated)
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a JSON answers file against a question bank
    Score {
        /// Question bank TOML (defaults to `default_bank` from the config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Answers JSON: {"<phase>": {"<question>": value}}
        #[arg(long)]
        answers: PathBuf,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Export format: json, html, svg, markdown, all (comma-separated)
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a question bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// List question banks in a directory
    List {
        /// Directory to search
        #[arg(long, default_value = "banks")]
        dir: PathBuf,
    },

    /// Render a radar chart from label=value pairs
    Radar {
        /// Values, e.g. "Will=80,Interest=65,Skill=4/5"
        #[arg(long)]
        values: String,

        /// Canvas size in pixels
        #[arg(long)]
        size: Option<f64>,

        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: svg, json
        #[arg(long, default_value = "svg")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare a retake against an earlier report
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if the overall score went down
        #[arg(long)]
        fail_on_decline: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and the example question bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wiscar=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            bank,
            output,
            format,
            config,
        } => commands::take::execute(bank, output, format, config),
        Commands::Score {
            bank,
            answers,
            output,
            format,
            config,
        } => commands::score::execute(bank, answers, output, format, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::List { dir } => commands::list::execute(dir),
        Commands::Radar {
            values,
            size,
            output,
            format,
            config,
        } => commands::radar::execute(values, size, output, format, config),
        Commands::Compare {
            baseline,
            current,
            fail_on_decline,
            format,
        } => commands::compare::execute(baseline, current, fail_on_decline, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
