//! Story generation command handler.

use anyhow::{Context, bail};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use storyloom::{
    OpenAICompatibleClient, StoryPipeline, StoryloomConfig, TerminalDisplay, TerminalProgress,
};

/// Settings from the command line that override the configuration files.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    /// Model identifier
    pub model: Option<String>,
    /// Chapter concurrency bound
    pub concurrency: Option<usize>,
}

impl RunOverrides {
    /// Apply the overrides to a loaded configuration.
    pub fn apply(&self, mut config: StoryloomConfig) -> StoryloomConfig {
        if let Some(model) = &self.model {
            config.provider.model = model.clone();
        }
        if let Some(n) = self.concurrency {
            config.pipeline = config.pipeline.with_max_concurrent_chapters(n);
        }
        config
    }
}

/// Use the argument when given, otherwise read the whole of stdin.
///
/// # Errors
///
/// Fails when stdin cannot be read or the prompt is blank.
pub fn resolve_prompt(arg: Option<String>, mut stdin: impl Read) -> anyhow::Result<String> {
    let prompt = match arg {
        Some(prompt) => prompt,
        None => {
            let mut buf = String::new();
            stdin
                .read_to_string(&mut buf)
                .context("Failed to read story prompt from stdin")?;
            buf
        }
    };

    let prompt = prompt.trim();
    if prompt.is_empty() {
        bail!("No story prompt given. Usage: storyloom [PROMPT] or pipe the prompt on stdin");
    }
    Ok(prompt.to_string())
}

/// Generate a story and stream it to the terminal.
#[tracing::instrument(skip_all)]
pub async fn run_story(
    prompt: String,
    config_path: Option<&Path>,
    overrides: &RunOverrides,
) -> anyhow::Result<()> {
    let config = StoryloomConfig::load_with(config_path).context("Failed to load configuration")?;
    let config = overrides.apply(config);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        provider = %config.provider.name,
        model = %config.provider.model,
        max_concurrent_chapters = config.pipeline.max_concurrent_chapters(),
        "Configuration loaded"
    );

    let client = OpenAICompatibleClient::from_config(&config)
        .context("Failed to create generation client")?;

    let pipeline = StoryPipeline::new(client)
        .with_config(&config)
        .with_display(Arc::new(TerminalDisplay::stdout()))
        .with_progress_sink(Arc::new(TerminalProgress::stderr()));

    let run = pipeline.run(prompt).await.context("Story generation failed")?;

    tracing::info!(
        chapters = run.chapters().len(),
        story_len = run.full_story().as_str().len(),
        "Story finished"
    );
    Ok(())
}
