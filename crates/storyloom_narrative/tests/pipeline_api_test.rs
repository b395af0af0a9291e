//! Full story run against the configured provider.
//!
//! Run with `--features api` and the provider's key in the environment.
//! Makes a few dozen generation calls.

use storyloom_models::OpenAICompatibleClient;
use storyloom_narrative::StoryPipeline;
use storyloom_rate_limit::StoryloomConfig;

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_lighthouse_story() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = StoryloomConfig::load()?;
    let driver = OpenAICompatibleClient::from_config(&config)?;
    let pipeline = StoryPipeline::new(driver).with_config(&config);

    let run = pipeline
        .run("A lonely lighthouse keeper discovers a message in a bottle")
        .await?;

    assert!(!run.chapters().is_empty());
    assert_eq!(run.chapter_texts().len(), run.chapters().len());
    assert!(!run.full_story().as_str().trim().is_empty());
    println!("Title: {:?}", run.blueprint().title());
    println!("Chapters: {:?}", run.chapters().titles().collect::<Vec<_>>());

    Ok(())
}
