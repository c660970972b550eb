mod helpers;

use std::sync::Arc;

use folio::application::ports::{ContentBlock, GenerationParams, LlmClientError};
use folio::application::services::{WindowError, WindowProcessor, WindowTask};
use folio::domain::{ModelResponse, OutputSchema, WindowManager};
use serde_json::json;

use helpers::{FakeRasterizer, ScriptedLlmClient, local_source};

fn task() -> WindowTask {
    WindowTask {
        question: "What is the invoice total?".to_string(),
        system_prompt: "You read invoices.".to_string(),
        params: GenerationParams::default(),
        output_schema: None,
    }
}

#[tokio::test]
async fn given_45_page_document_when_processing_then_renders_each_window_in_order() {
    let rasterizer = Arc::new(FakeRasterizer::new(45));
    let llm = Arc::new(ScriptedLlmClient::answering("nothing here"));
    let processor = WindowProcessor::new(rasterizer.clone(), llm.clone());
    let mut manager = WindowManager::new(45, 20).unwrap();

    let results = processor
        .process_document(&local_source("big.pdf"), &mut manager, 2, &task())
        .await
        .unwrap();

    let ranges: Vec<(u32, u32)> = results
        .iter()
        .map(|r| (r.window.window_start, r.window.window_end))
        .collect();
    assert_eq!(ranges, vec![(1, 20), (19, 38), (37, 45)]);

    let calls = rasterizer.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1], (19..=38).collect::<Vec<_>>());
    assert_eq!(llm.call_count(), 3);
}

#[tokio::test]
async fn given_window_when_building_request_then_labels_pages_and_notes_visible_range() {
    let rasterizer = Arc::new(FakeRasterizer::new(45));
    let llm = Arc::new(ScriptedLlmClient::answering("ok"));
    let processor = WindowProcessor::new(rasterizer, llm.clone());
    let mut manager = WindowManager::new(45, 20).unwrap();
    manager.seek(37);

    processor
        .process(&local_source("big.pdf"), manager.window_info(), &task())
        .await
        .unwrap();

    let requests = llm.recorded();
    let request = &requests[0];
    assert_eq!(request.system_prompt, "You read invoices.");
    assert_eq!(request.image_count(), 9);
    assert_eq!(request.content[0], ContentBlock::Text("Page: 37".to_string()));
    assert_eq!(
        request.content.last(),
        Some(&ContentBlock::Text(
            "What is the invoice total?\n\nNote: You are currently viewing pages 37 to 45 of 45 total pages."
                .to_string()
        ))
    );
}

#[tokio::test]
async fn given_model_fails_on_second_window_when_processing_then_aborts_run() {
    let rasterizer = Arc::new(FakeRasterizer::new(45));
    let llm = Arc::new(
        ScriptedLlmClient::answering("unused")
            .then_reply("first")
            .then_fail(LlmClientError::RateLimited),
    );
    let processor = WindowProcessor::new(rasterizer.clone(), llm.clone());
    let mut manager = WindowManager::new(45, 20).unwrap();

    let error = processor
        .process_document(&local_source("big.pdf"), &mut manager, 2, &task())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        WindowError::Invocation {
            window_start: 19,
            window_end: 38,
            source: LlmClientError::RateLimited
        }
    ));
    assert_eq!(llm.call_count(), 2);
    assert_eq!(rasterizer.calls().len(), 2);
}

#[tokio::test]
async fn given_render_failure_when_processing_then_reports_window_and_skips_model() {
    let rasterizer = Arc::new(FakeRasterizer::new(10).failing_on(4));
    let llm = Arc::new(ScriptedLlmClient::answering("unused"));
    let processor = WindowProcessor::new(rasterizer, llm.clone());
    let mut manager = WindowManager::new(10, 20).unwrap();

    let error = processor
        .process_document(&local_source("doc.pdf"), &mut manager, 2, &task())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        WindowError::Render {
            window_start: 1,
            window_end: 10,
            ..
        }
    ));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn given_json_reply_when_processing_window_then_result_is_structured() {
    let rasterizer = Arc::new(FakeRasterizer::new(3));
    let llm = Arc::new(ScriptedLlmClient::answering(r#"{"total": "42.00"}"#));
    let processor = WindowProcessor::new(rasterizer, llm);
    let mut manager = WindowManager::new(3, 20).unwrap();

    let results = processor
        .process_document(&local_source("doc.pdf"), &mut manager, 0, &task())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0].response, ModelResponse::Structured(_)));
}

#[tokio::test]
async fn given_overlap_not_below_window_when_processing_then_rejects_before_rendering() {
    let rasterizer = Arc::new(FakeRasterizer::new(30));
    let llm = Arc::new(ScriptedLlmClient::answering("unused"));
    let processor = WindowProcessor::new(rasterizer.clone(), llm);
    let mut manager = WindowManager::new(30, 5).unwrap();

    let result = processor
        .process_document(&local_source("doc.pdf"), &mut manager, 5, &task())
        .await;

    assert!(matches!(result, Err(WindowError::Validation(_))));
    assert!(rasterizer.calls().is_empty());
}

#[tokio::test]
async fn given_output_schema_when_processing_window_then_prompt_carries_schema_and_note() {
    let rasterizer = Arc::new(FakeRasterizer::new(30));
    let llm = Arc::new(ScriptedLlmClient::answering("{\"total\": \"$42\"}"));
    let processor = WindowProcessor::new(rasterizer, llm.clone());
    let manager = WindowManager::new(30, 20).unwrap();
    let mut schema_task = task();
    schema_task.output_schema = Some(
        OutputSchema::new(json!({"type": "object", "properties": {"total": {"type": "string"}}}))
            .unwrap(),
    );

    let result = processor
        .process(&local_source("big.pdf"), manager.window_info(), &schema_task)
        .await
        .unwrap();

    assert!(result.response.is_structured());
    let requests = llm.recorded();
    let Some(ContentBlock::Text(prompt)) = requests[0].content.last() else {
        panic!("window prompt must be the last text block");
    };
    assert!(prompt.starts_with("Given the following schema:\n<schema>{"));
    assert!(prompt.contains("\"total\""));
    assert!(prompt.contains(
        "<question>What is the invoice total?\n\nNote: You are currently viewing pages 1 to 20 of 30 total pages.</question>"
    ));
}
