use std::path::PathBuf;

use citeblock_processor::RenderMode;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "citeblock")]
#[command(about = "CSL style management and citation rendering")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Defaults to ./citeblock.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },

    #[command(about = "Manage stored citation styles")]
    Styles {
        #[command(subcommand)]
        command: StylesCommand,
    },

    #[command(about = "Render a content item with a stored style")]
    Render {
        item: String,

        /// Defaults to the configured block style.
        #[arg(long)]
        style: Option<String>,

        #[arg(long)]
        mode: Option<RenderMode>,
    },
}

#[derive(Subcommand)]
pub enum StylesCommand {
    #[command(about = "List stored styles")]
    List {
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    #[command(about = "Print a style's CSL")]
    Show { id: String },

    #[command(about = "Add or replace a style from a CSL file")]
    Add {
        file: PathBuf,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        id: Option<String>,
    },

    #[command(about = "Delete a style")]
    Delete { id: String },
}

#[derive(Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
