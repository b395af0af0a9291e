//! Live calls against the configured provider.
//!
//! Run with `--features api` and the provider's key in the environment.

use storyloom_core::{GenerateRequest, Input, Message, Role};
use storyloom_interface::StoryDriver;
use storyloom_models::OpenAICompatibleClient;
use storyloom_rate_limit::StoryloomConfig;

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_generation() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = StoryloomConfig::load()?;
    let driver = OpenAICompatibleClient::from_config(&config)?;

    let message = Message::builder()
        .role(Role::User)
        .content(vec![Input::Text("Say hello in five words.".to_string())])
        .build()?;

    let request = GenerateRequest::builder()
        .messages(vec![message])
        .max_tokens(32u32)
        .build()?;

    let response = driver.generate(&request).await?;

    assert!(!response.outputs.is_empty(), "Should receive non-empty response");
    println!("Response: {}", response.text());

    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_complete() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = StoryloomConfig::load()?;
    let driver = OpenAICompatibleClient::from_config(&config)?;

    let text = driver
        .complete("Write one sentence about a lighthouse.")
        .await?;
    assert!(!text.trim().is_empty());

    Ok(())
}
