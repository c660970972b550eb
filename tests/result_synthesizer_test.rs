mod helpers;

use std::sync::Arc;

use serde_json::json;

use folio::application::ports::{ContentBlock, GenerationParams};
use folio::application::services::{ResultSynthesizer, combine_mechanically};
use folio::domain::{Answer, ModelResponse, OutputSchema, WindowInfo, WindowResult};

use helpers::ScriptedLlmClient;

fn window(start: u32, end: u32, total: u32) -> WindowInfo {
    WindowInfo {
        total_pages: total,
        window_start: start,
        window_end: end,
        window_size: end - start + 1,
        has_previous: start > 1,
        has_next: end < total,
    }
}

fn text_result(start: u32, end: u32, text: &str) -> WindowResult {
    WindowResult::new(window(start, end, 45), ModelResponse::Text(text.to_string()))
}

#[tokio::test]
async fn given_no_windows_when_combining_then_returns_empty_result_without_model_call() {
    let llm = Arc::new(ScriptedLlmClient::answering("unused"));
    let synthesizer = ResultSynthesizer::new(llm.clone());

    let answer = synthesizer
        .combine("q", Vec::new(), GenerationParams::default(), None)
        .await
        .unwrap();

    assert_eq!(answer, Answer::Direct(ModelResponse::Structured(json!({}))));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn given_single_window_when_combining_then_returns_it_unchanged() {
    let llm = Arc::new(ScriptedLlmClient::answering("unused"));
    let synthesizer = ResultSynthesizer::new(llm.clone());
    let only = text_result(1, 7, "The total is $42.");

    let answer = synthesizer
        .combine("q", vec![only.clone()], GenerationParams::default(), None)
        .await
        .unwrap();

    assert_eq!(answer, Answer::Direct(only.response));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn given_several_windows_when_combining_then_issues_one_synthesis_call() {
    let llm = Arc::new(ScriptedLlmClient::answering("The total is $42."));
    let synthesizer = ResultSynthesizer::new(llm.clone());
    let results = vec![
        text_result(1, 20, "No total on these pages."),
        text_result(19, 38, "Total: $42"),
        text_result(37, 45, "No total."),
    ];
    let params = GenerationParams {
        max_tokens: 512,
        temperature: 0.2,
    };

    let answer = synthesizer
        .combine("What is the total?", results.clone(), params, None)
        .await
        .unwrap();

    assert_eq!(
        answer,
        Answer::Synthesized {
            synthesized_response: ModelResponse::Text("The total is $42.".to_string()),
            window_results: results,
        }
    );

    let requests = llm.recorded();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.params.max_tokens, 1024);
    assert_eq!(request.image_count(), 0);
    let ContentBlock::Text(prompt) = &request.content[0] else {
        panic!("synthesis prompt must be text");
    };
    assert!(prompt.contains("Your question was: \"What is the total?\""));
    assert!(prompt.contains("Window 2 (Pages 19-38):\nTotal: $42"));
    assert!(request.system_prompt.contains("synthesizing"));
}

#[test]
fn given_text_results_when_combining_mechanically_then_concatenates_by_page_range() {
    let combined = combine_mechanically(&[text_result(1, 20, "alpha"), text_result(19, 38, "beta")]);

    assert_eq!(
        combined,
        ModelResponse::Text("Pages 1-20:\nalpha\n\nPages 19-38:\nbeta\n\n".to_string())
    );
}

#[test]
fn given_structured_results_when_combining_mechanically_then_keys_by_window() {
    let results = vec![
        WindowResult::new(window(1, 20, 30), ModelResponse::Structured(json!({"a": 1}))),
        WindowResult::new(window(19, 30, 30), ModelResponse::Structured(json!({"b": 2}))),
    ];

    let ModelResponse::Structured(combined) = combine_mechanically(&results) else {
        panic!("expected structured output");
    };

    assert_eq!(combined["sliding_window_processing"]["total_windows"], 2);
    assert_eq!(
        combined["sliding_window_processing"]["window_info"][1]["window_start"],
        19
    );
    assert_eq!(combined["window_1_pages_1-20"], json!({"a": 1}));
    assert_eq!(combined["window_2_pages_19-30"], json!({"b": 2}));
}

#[test]
fn given_mixed_results_when_combining_mechanically_then_wraps_as_windows_list() {
    let results = vec![
        text_result(1, 20, "alpha"),
        WindowResult::new(window(19, 38, 45), ModelResponse::Structured(json!([1, 2]))),
    ];

    let combined = combine_mechanically(&results);

    assert_eq!(
        combined,
        ModelResponse::Structured(json!({"windows": ["alpha", [1, 2]]}))
    );
}

#[tokio::test]
async fn given_output_schema_when_synthesizing_then_prompt_requests_the_schema() {
    let llm = Arc::new(ScriptedLlmClient::answering("{\"total\": \"$42\"}"));
    let synthesizer = ResultSynthesizer::new(llm.clone());
    let schema = OutputSchema::new(json!({"type": "object"})).unwrap();

    let answer = synthesizer
        .combine(
            "What is the total?",
            vec![text_result(1, 20, "none"), text_result(19, 38, "Total: $42")],
            GenerationParams::default(),
            Some(&schema),
        )
        .await
        .unwrap();

    let Answer::Synthesized { synthesized_response, .. } = answer else {
        panic!("expected a synthesized answer");
    };
    assert!(synthesized_response.is_structured());
    let requests = llm.recorded();
    let ContentBlock::Text(prompt) = &requests[0].content[0] else {
        panic!("synthesis prompt must be text");
    };
    assert!(prompt.starts_with("Given the following schema:\n<schema>{\"type\":\"object\"}</schema>"));
    assert!(prompt.contains("Your question was: \"What is the total?\""));
    assert!(prompt.contains("Window 2 (Pages 19-38):\nTotal: $42"));
    assert!(prompt.ends_with("</question>"));
}
