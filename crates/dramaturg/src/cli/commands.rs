//! CLI command definitions.

use clap::{Parser, Subcommand};
use dramaturg::ExportFormat;
use std::path::PathBuf;

/// Dramaturg - adapt prose into multi-episode short-drama scripts
#[derive(Parser, Debug)]
#[command(name = "dramaturg")]
#[command(about = "Adapt prose into multi-episode short-drama scripts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (replaces the home and current-directory lookup)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API key for this run, overriding the configured environment variable
    #[arg(long, global = true)]
    pub api_key: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend an episode count for a source text
    Analyze {
        /// Source text file, or `-` for stdin
        input: PathBuf,
    },

    /// Generate a script from a source text
    Generate {
        /// Source text file, or `-` for stdin
        input: PathBuf,

        /// Number of episodes (1-30); asks the model when omitted
        #[arg(long)]
        episodes: Option<u32>,

        /// Target seconds per episode
        #[arg(long)]
        duration: Option<u32>,

        /// Genre label, e.g. revenge, romance, suspense
        #[arg(long)]
        story_type: Option<String>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: json, text or markdown
        #[arg(long, default_value = "json")]
        format: ExportFormat,
    },

    /// Regenerate a script's storyboard to fix its quality issues
    Optimize {
        /// Script JSON produced by `generate`
        script: PathBuf,

        /// Original source text file
        #[arg(long)]
        source: Option<PathBuf>,

        /// Target seconds per episode (defaults to the script's average)
        #[arg(long)]
        duration: Option<u32>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: json, text or markdown
        #[arg(long, default_value = "json")]
        format: ExportFormat,
    },

    /// Render a script JSON in another format
    Export {
        /// Script JSON produced by `generate`
        script: PathBuf,

        /// Output format: json, text or markdown
        #[arg(long, default_value = "markdown")]
        format: ExportFormat,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Plan character designs, location designs and shot lists
    Designs {
        /// Script JSON produced by `generate`
        script: PathBuf,

        /// Also plan a shot list for every episode
        #[arg(long)]
        shots: bool,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_flags_parse() {
        let cli = Cli::try_parse_from([
            "dramaturg",
            "generate",
            "novel.txt",
            "--episodes",
            "4",
            "--format",
            "MD",
            "-v",
        ])
        .expect("valid arguments");

        assert!(cli.verbose);
        match cli.command {
            Commands::Generate {
                input,
                episodes,
                duration,
                format,
                ..
            } => {
                assert_eq!(input, PathBuf::from("novel.txt"));
                assert_eq!(episodes, Some(4));
                assert_eq!(duration, None);
                assert_eq!(format, ExportFormat::Markdown);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_export_defaults_to_markdown() {
        let cli = Cli::try_parse_from(["dramaturg", "export", "script.json"]).expect("valid");
        match cli.command {
            Commands::Export { format, output, .. } => {
                assert_eq!(format, ExportFormat::Markdown);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["dramaturg", "export", "s.json", "--format", "pdf"]).is_err());
    }
}
