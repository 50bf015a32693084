use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::layout::catalogs;

#[derive(Subcommand)]
pub enum CatalogCommands {
    #[command(about = "List block types and their variants")]
    Blocks,

    #[command(about = "List theme presets")]
    Themes,
}

pub async fn handle(cmd: CatalogCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        CatalogCommands::Blocks => {
            let catalog = &catalogs().blocks;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "blocks": catalog.blocks }))?);
                }
                OutputFormat::Text => {
                    for definition in &catalog.blocks {
                        println!("{} ({})", definition.block_type, definition.label);
                        for variant in &definition.variants {
                            let marker = if variant.name == definition.default_variant { "*" } else { " " };
                            println!("  {} {} - {}", marker, variant.name, variant.description);
                        }
                    }
                }
            }
            Ok(())
        }
        CatalogCommands::Themes => {
            let catalog = &catalogs().themes;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "themes": catalog.presets }))?);
                }
                OutputFormat::Text => {
                    for preset in &catalog.presets {
                        println!(
                            "{} ({}) - {} [{} -> {}]",
                            preset.id,
                            preset.name,
                            preset.description,
                            preset.colors.background.from,
                            preset.colors.background.to
                        );
                    }
                }
            }
            Ok(())
        }
    }
}
