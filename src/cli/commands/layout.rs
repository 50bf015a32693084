use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::layout::{catalogs, resolve_layout, validate_document};

#[derive(Subcommand)]
pub enum LayoutCommands {
    #[command(about = "Validate a layout document file against the catalogs")]
    Validate {
        #[arg(help = "Path to a layout JSON file")]
        file: String,
    },

    #[command(about = "Resolve a layout document file to its render-ready form")]
    Preview {
        #[arg(help = "Path to a layout JSON file")]
        file: String,
    },
}

pub async fn handle(cmd: LayoutCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        LayoutCommands::Validate { file } => {
            let document = read_document(&file)?;
            let catalogs = catalogs();

            match validate_document(document, &catalogs.blocks, &catalogs.themes) {
                Ok(layout) => output_success(
                    &output_format,
                    &format!("{} is valid", file),
                    Some(json!({
                        "profile_id": layout.profile_id,
                        "blocks": layout.blocks.len(),
                    })),
                ),
                Err(e) => {
                    output_error(&output_format, &e.to_string(), Some(&e.field()))?;
                    std::process::exit(1);
                }
            }
        }
        LayoutCommands::Preview { file } => {
            let document = read_document(&file)?;
            let catalogs = catalogs();

            let layout = match validate_document(document, &catalogs.blocks, &catalogs.themes) {
                Ok(layout) => layout,
                Err(e) => {
                    output_error(&output_format, &e.to_string(), Some(&e.field()))?;
                    std::process::exit(1);
                }
            };
            let resolved = resolve_layout(&layout, &catalogs.blocks, &catalogs.themes)?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&resolved)?);
                }
                OutputFormat::Text => {
                    println!("theme: {}", resolved.theme.name);
                    for block in &resolved.blocks {
                        println!("{} {} ({})", block.id, block.block_type, block.variant);
                    }
                }
            }
            Ok(())
        }
    }
}

fn read_document(path: &str) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path, e))?;
    serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("{} is not valid JSON: {}", path, e))
}
