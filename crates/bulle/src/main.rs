//! Bulle CLI binary.
//!
//! This binary provides command-line access to Bulle's functionality:
//! - Parse saved model answers into JSON
//! - Generate an outline, or a whole comic script chapter by chapter
//! - Serve the HTTP API

use bulle::{BulleConfig, init_tracing};
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, generate_comic, generate_outline, parse_answer, serve_api};

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => BulleConfig::from_file(path)?,
        None => BulleConfig::load()?,
    };

    // Execute the requested command
    match cli.command {
        Commands::Parse {
            kind,
            file,
            dialect,
            strict_pages,
        } => {
            println!("{}", parse_answer(kind, &file, dialect, strict_pages, &config)?);
        }

        Commands::Outline(story) => {
            println!("{}", generate_outline(story, &config).await?);
        }

        Commands::Generate { story, chapters } => {
            println!("{}", generate_comic(story, &chapters, &config).await?);
        }

        Commands::Serve { bind } => {
            serve_api(bind, &config).await?;
        }
    }

    Ok(())
}
