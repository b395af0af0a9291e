//! End-to-end run through the facade with terminal sinks on in-memory writers.

use async_trait::async_trait;
use std::sync::Arc;
use storyloom::{
    GenerateRequest, GenerateResponse, Output, StoryDriver, StoryPipeline, StoryloomResult,
    TemplateEngine, TemplateId, TerminalDisplay, TerminalProgress,
};

/// Replies by the first word of each compact template.
struct Canned;

#[async_trait]
impl StoryDriver for Canned {
    async fn generate(&self, req: &GenerateRequest) -> StoryloomResult<GenerateResponse> {
        let prompt = req.messages[0].text();
        let reply = match prompt.split_whitespace().next().unwrap_or_default() {
            "CHAPTERS" => r#"{"chapters": {"Landfall": "They arrive", "Ebb": "They leave"}}"#.to_string(),
            "ACTS" => r#"{"act-1": {"description": "a"}, "act-2": {"description": "b"}, "act-3": {"description": "c"}}"#
                .to_string(),
            "WRITE" => format!("Prose {}.", prompt.lines().next().unwrap_or_default()),
            other => format!("{} reply", other.to_lowercase()),
        };
        Ok(GenerateResponse {
            outputs: vec![Output::Text(reply)],
        })
    }

    fn provider_name(&self) -> &str {
        "canned"
    }

    fn model_name(&self) -> &str {
        "canned-1"
    }
}

fn templates() -> TemplateEngine {
    TemplateEngine::new()
        .with_template(TemplateId::ChooseStructure, "STRUCTURE {{story_prompt}}")
        .with_template(TemplateId::SummarizeStructure, "SUMMARY")
        .with_template(TemplateId::Blueprint, "BLUEPRINT {{structure_summary}}")
        .with_template(TemplateId::ChaptersJson, "CHAPTERS {{blueprint}}")
        .with_template(TemplateId::ActOutline, "OUTLINE {{chapter_title}}")
        .with_template(TemplateId::ActsJson, "ACTS {{acts}}")
        .with_template(TemplateId::WriteAct, "WRITE {{chapter_number}}.{{act_number}}")
        .with_template(TemplateId::ContinueAct, "{{previous_text}}")
}

#[tokio::test]
async fn test_story_and_progress_reach_their_writers() {
    let display = Arc::new(TerminalDisplay::new(Vec::new()));
    let progress = Arc::new(TerminalProgress::new(Vec::new()));

    let pipeline = StoryPipeline::new(Canned)
        .with_templates(templates())
        .with_display(display.clone())
        .with_progress_sink(progress.clone());
    let run = pipeline.run("Two short chapters").await.unwrap();
    drop(pipeline);

    let stdout = String::from_utf8(
        Arc::try_unwrap(display)
            .unwrap_or_else(|_| panic!("display still shared"))
            .into_inner(),
    )
    .unwrap();
    assert_eq!(
        stdout,
        "\nChapter 1: Landfall\n\nProse WRITE 1.1.\nProse WRITE 1.2.\nProse WRITE 1.3.\n\
         \nChapter 2: Ebb\n\nProse WRITE 2.1.\nProse WRITE 2.2.\nProse WRITE 2.3.\n"
    );
    assert_eq!(
        run.full_story().as_str(),
        "Prose WRITE 1.1.\nProse WRITE 1.2.\nProse WRITE 1.3.\n\nProse WRITE 2.1.\nProse WRITE 2.2.\nProse WRITE 2.3."
    );

    let stderr = String::from_utf8(
        Arc::try_unwrap(progress)
            .unwrap_or_else(|_| panic!("progress still shared"))
            .into_inner(),
    )
    .unwrap();
    let lines: Vec<&str> = stderr.lines().collect();
    assert!(lines.iter().all(|l| l.starts_with('[') && l.contains("] ")));
    assert!(lines[0].ends_with("] Starting story generation process"));
    assert!(lines.iter().any(|l| l.ends_with("] Processing Chapter 2: Ebb")));
    assert!(lines.iter().any(|l| l.ends_with("] Story generation complete")));
}
