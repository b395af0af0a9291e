//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Storyloom - turn a story idea into a multi-chapter story
#[derive(Parser, Debug)]
#[command(name = "storyloom")]
#[command(about = "Turn a story idea into a multi-chapter story", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Story idea; read from stdin when omitted
    pub prompt: Option<String>,

    /// Configuration file layered over the defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model identifier, overriding the configured one
    #[arg(long)]
    pub model: Option<String>,

    /// Chapters generated at once
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_options() {
        let cli = Cli::try_parse_from([
            "storyloom",
            "A lighthouse keeper",
            "--config",
            "story.toml",
            "--model",
            "openai/gpt-4o-mini",
            "--concurrency",
            "3",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.prompt.as_deref(), Some("A lighthouse keeper"));
        assert_eq!(cli.config, Some(PathBuf::from("story.toml")));
        assert_eq!(cli.model.as_deref(), Some("openai/gpt-4o-mini"));
        assert_eq!(cli.concurrency, Some(3));
        assert!(cli.verbose);
    }

    #[test]
    fn test_prompt_is_optional() {
        let cli = Cli::try_parse_from(["storyloom"]).unwrap();
        assert!(cli.prompt.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(Cli::try_parse_from(["storyloom", "idea", "--concurrency", "0"]).is_err());
    }
}
