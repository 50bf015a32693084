pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "deck")]
#[command(about = "PlayerDeck CLI - Inspect catalogs and work with layout documents locally")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Browse the block and theme catalogs")]
    Catalog {
        #[command(subcommand)]
        cmd: commands::catalog::CatalogCommands,
    },

    #[command(about = "Validate and preview layout documents")]
    Layout {
        #[command(subcommand)]
        cmd: commands::layout::LayoutCommands,
    },

    #[command(about = "Development token helpers")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Catalog { cmd } => commands::catalog::handle(cmd, output_format).await,
        Commands::Layout { cmd } => commands::layout::handle(cmd, output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, output_format).await,
    }
}
