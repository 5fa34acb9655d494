mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "studydeck-cli", about = "Quiz and flashcard study deck", version)]
struct Cli {
    /// Config file (default: ~/.config/studydeck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the stored items (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum KindArg {
    Flashcard,
    MultipleChoice,
    TrueFalse,
    Essay,
}

#[derive(Subcommand)]
enum Command {
    /// List study items, most recent first
    List {
        /// Show only starred items
        #[arg(long)]
        favorites: bool,
    },

    /// Author a new item
    Add {
        /// Item kind
        kind: KindArg,
        /// Question (front of a flashcard)
        question: String,
        /// Correct answer (back of a flashcard, reference text for an essay)
        answer: String,
        /// A multiple choice option; repeat for each option
        #[arg(long = "option")]
        options: Vec<String>,
        /// Star the item right away
        #[arg(long)]
        favorite: bool,
    },

    /// Delete an item
    Remove {
        /// Item id
        id: String,
    },

    /// Star or unstar an item
    Favorite {
        /// Item id
        id: String,
    },

    /// Import generated items from a JSON array or an assistant reply
    Ingest {
        /// Input file (use "-" or omit to read stdin)
        input: Option<String>,
    },

    /// Walk through the items interactively
    Study {
        /// Study only starred items
        #[arg(long)]
        favorites: bool,
    },
}

/// Read a file, or stdin for "-" / no argument
fn read_input(input: Option<&str>) -> anyhow::Result<String> {
    use anyhow::Context;

    match input {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
        }
        _ => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Command::List { favorites } => {
            commands::list::run(&mut app, favorites, &cli.format, use_color)?;
        }
        Command::Add {
            kind,
            question,
            answer,
            options,
            favorite,
        } => {
            commands::item::run_add(
                &mut app,
                kind,
                question,
                answer,
                options,
                favorite,
                &cli.format,
            )?;
        }
        Command::Remove { id } => {
            commands::item::run_remove(&mut app, &id, &cli.format)?;
        }
        Command::Favorite { id } => {
            commands::item::run_favorite(&mut app, &id, &cli.format)?;
        }
        Command::Ingest { input } => {
            let text = read_input(input.as_deref())?;
            commands::ingest::run(&mut app, &text, &cli.format, use_color)?;
        }
        Command::Study { favorites } => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            commands::study::run(&mut app, favorites, &mut stdin.lock(), &mut stdout, use_color)?;
        }
    }

    Ok(())
}
