use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::application::ports::{
    CompletionRequest, ContentBlock, GenerationParams, LlmClient, LlmClientError,
};
use crate::domain::{Answer, ModelResponse, OutputSchema, WindowResult};

const SYNTHESIS_SYSTEM_PROMPT: &str = "You are an expert at synthesizing information from document sections.
Your task is to provide direct, concise answers based on the information found.

Guidelines:
1. Use only the sections that contain relevant information.
2. Do not mention sections that lack relevant information.
3. Answer the question itself; do not describe the structure of the document.
4. If the answer appears in a single section, give that answer as is.
5. If several sections are relevant, merge them into one coherent response.
6. If no section is relevant, say that the document does not cover the topic.

Never open with phrases such as \"Based on the sections provided\" or \"According to the document sections\".";

/// Turns per-window results into one answer.
pub struct ResultSynthesizer {
    llm_client: Arc<dyn LlmClient>,
}

impl ResultSynthesizer {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }

    /// Zero windows yield the empty fallback, a single window is returned unchanged,
    /// and two or more cost exactly one extra model call. With `output_schema` the
    /// synthesis prompt asks for the same schema the windows answered in.
    pub async fn combine(
        &self,
        question: &str,
        results: Vec<WindowResult>,
        params: GenerationParams,
        output_schema: Option<&OutputSchema>,
    ) -> Result<Answer, LlmClientError> {
        match results.len() {
            0 => Ok(Answer::Direct(combine_mechanically(&results))),
            1 => {
                let only = results.into_iter().next().map(|r| r.response);
                Ok(Answer::Direct(
                    only.unwrap_or_else(ModelResponse::empty_structured),
                ))
            }
            windows => {
                tracing::info!(windows, "Synthesizing window results");

                let prompt = synthesis_prompt(question, &results);
                let prompt = match output_schema {
                    Some(schema) => schema.apply(&prompt),
                    None => prompt,
                };
                let request = CompletionRequest {
                    system_prompt: SYNTHESIS_SYSTEM_PROMPT.to_string(),
                    content: vec![ContentBlock::Text(prompt)],
                    params: GenerationParams {
                        max_tokens: params.max_tokens.saturating_mul(2),
                        temperature: params.temperature,
                    },
                };

                let raw = self.llm_client.complete(&request).await?;

                Ok(Answer::Synthesized {
                    synthesized_response: ModelResponse::from_completion(&raw),
                    window_results: results,
                })
            }
        }
    }
}

fn synthesis_prompt(question: &str, results: &[WindowResult]) -> String {
    let sections = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "Window {} (Pages {}):\n{}",
                i + 1,
                r.window.range_label(),
                r.response.render()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "I've analyzed a document in {count} sections and found information related to your question.\n\n\
         Your question was: \"{question}\"\n\n\
         Here are the results from each section:\n\n\
         {sections}\n\n\
         Please provide a direct, concise answer to the question based on the information found.\n\
         If the answer is found in only one section, simply provide that answer without discussing other sections.\n\
         If no sections contain relevant information, state that the document does not contain information about the topic.",
        count = results.len(),
    )
}

/// Merges window results without a model call.
///
/// All text results are concatenated under page-range headings. All structured
/// results are keyed by window and page range next to a `sliding_window_processing`
/// summary. Anything else is wrapped as `{"windows": [...]}`.
pub fn combine_mechanically(results: &[WindowResult]) -> ModelResponse {
    if results.is_empty() {
        return ModelResponse::empty_structured();
    }

    let texts: Option<Vec<&str>> = results
        .iter()
        .map(|r| match &r.response {
            ModelResponse::Text(text) => Some(text.as_str()),
            ModelResponse::Structured(_) => None,
        })
        .collect();
    if let Some(texts) = texts {
        let combined = results
            .iter()
            .zip(texts)
            .map(|(r, text)| format!("Pages {}:\n{}\n\n", r.window.range_label(), text))
            .collect::<String>();
        return ModelResponse::Text(combined);
    }

    if results.iter().all(|r| r.response.is_structured()) {
        let mut combined = Map::new();
        combined.insert(
            "sliding_window_processing".to_string(),
            json!({
                "total_windows": results.len(),
                "window_info": results.iter().map(|r| r.window).collect::<Vec<_>>(),
            }),
        );
        for (i, r) in results.iter().enumerate() {
            combined.insert(
                format!("window_{}_pages_{}", i + 1, r.window.range_label()),
                r.response.to_value(),
            );
        }
        return ModelResponse::Structured(Value::Object(combined));
    }

    ModelResponse::Structured(json!({
        "windows": results.iter().map(|r| r.response.to_value()).collect::<Vec<_>>(),
    }))
}
