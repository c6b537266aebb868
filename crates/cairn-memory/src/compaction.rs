// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rolling-window compaction: summarizes the oldest conversation turns via
//! an LLM call so stored history stays bounded.

use cairn_core::traits::ProviderAdapter;
use cairn_core::types::{ProviderMessage, ProviderRequest, TokenUsage};
use cairn_core::CairnError;

/// Builds the summarization prompt from the selected turns, numbered in
/// insertion order.
pub fn build_summary_prompt(contents: &[&str]) -> String {
    let conversations_text: String = contents
        .iter()
        .enumerate()
        .map(|(i, content)| format!("Conversation {}:\n{}", i + 1, content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Please create a concise summary of the following conversations:\n\n\
         {conversations_text}\n\n\
         Provide a comprehensive but concise summary."
    )
}

/// Generates a summary of the given conversation turns using an LLM call.
///
/// Returns the summary text and the token usage of the call. Failures are
/// the caller's to absorb; compaction is best-effort.
pub async fn generate_summary(
    provider: &dyn ProviderAdapter,
    contents: &[&str],
    model: &str,
    max_tokens: u32,
) -> Result<(String, TokenUsage), CairnError> {
    let request = ProviderRequest {
        model: model.to_string(),
        messages: vec![ProviderMessage {
            role: "user".to_string(),
            content: build_summary_prompt(contents),
        }],
        max_tokens,
    };

    let response = provider.complete(request).await?;

    tracing::info!(
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        model = model,
        original_turns = contents.len(),
        "compaction summary generated"
    );

    Ok((response.content, response.usage))
}
