//! chapterquiz CLI: list chapters, validate question sets, and grade answers.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "chapterquiz", version, about = "Chapter quiz grading engine")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List chapters with their last recorded result
    Chapters {
        /// Keyword matched against title and description
        #[arg(long)]
        search: Option<String>,
    },

    /// Check a question set for content problems
    Validate {
        /// Chapter id to load from the configured source
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        chapter: Option<String>,

        /// Path to a chapter JSON file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Grade an answers file against a chapter
    Grade {
        /// Chapter id
        #[arg(long)]
        chapter: String,

        /// JSON object mapping question id to answer
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Also write an HTML review page
        #[arg(long)]
        html: Option<PathBuf>,

        /// Do not record the attempt
        #[arg(long)]
        no_save: bool,
    },

    /// Show the last recorded attempt for a chapter
    Last {
        /// Chapter id
        #[arg(long)]
        chapter: String,
    },

    /// Create starter config and a sample question directory
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chapterquiz=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Chapters { search } => commands::chapters::execute(search, config).await,
        Commands::Validate { chapter, file } => {
            commands::validate::execute(chapter, file, config).await
        }
        Commands::Grade {
            chapter,
            answers,
            format,
            html,
            no_save,
        } => commands::grade::execute(chapter, answers, format, html, no_save, config).await,
        Commands::Last { chapter } => commands::last::execute(chapter, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
