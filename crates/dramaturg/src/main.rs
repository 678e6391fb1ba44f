//! Dramaturg CLI binary.
//!
//! This binary provides command-line access to the adaptation pipeline:
//! - Recommend an episode count for a source text
//! - Generate and optimize scripts
//! - Export scripts and plan designs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{
    Cli, CommandContext, Commands, GenerateArgs, run_analyze, run_designs, run_export,
    run_generate, run_optimize,
};
use dramaturg::DramaturgResult;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dispatch(cli).await {
        eprintln!("Error: {}", e.user_message());
        return Err(e.into());
    }

    Ok(())
}

/// Execute the requested command.
async fn dispatch(cli: Cli) -> DramaturgResult<()> {
    let context = || CommandContext::new(cli.config.as_deref(), cli.api_key.clone());

    match cli.command {
        Commands::Analyze { input } => run_analyze(&context()?, &input).await,

        Commands::Generate {
            input,
            episodes,
            duration,
            story_type,
            output,
            format,
        } => {
            let args = GenerateArgs {
                input,
                episodes,
                duration,
                story_type,
                output,
                format,
            };
            run_generate(&context()?, args).await
        }

        Commands::Optimize {
            script,
            source,
            duration,
            output,
            format,
        } => {
            run_optimize(
                &context()?,
                &script,
                source.as_deref(),
                duration,
                output.as_ref(),
                format,
            )
            .await
        }

        Commands::Export {
            script,
            format,
            output,
        } => run_export(&script, format, output.as_ref()),

        Commands::Designs {
            script,
            shots,
            output,
        } => run_designs(&context()?, &script, shots, output.as_ref()).await,
    }
}
