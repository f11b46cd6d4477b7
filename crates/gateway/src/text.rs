//! Text (commercial copy) generation.

use manaforge_core::error::GenerationError;
use manaforge_core::request::TextRequest;

use crate::client::GenerationClient;
use crate::wire::{ChatMessage, ChatRequest, ChatResponse};

/// System instruction applied when the request does not supply one.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "You are a digital commerce strategist who excels at writing high-converting commercial copy.";

/// Sampling temperature for all chat-style calls.
const TEMPERATURE: f32 = 0.7;

/// Build the chat-completion body for a text generation.
pub fn build_chat_request(request: &TextRequest) -> ChatRequest {
    let system = request
        .system_instruction
        .clone()
        .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string());

    ChatRequest {
        model: request.model.as_str().to_string(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: request.prompt.clone(),
            },
        ],
        temperature: TEMPERATURE,
    }
}

/// Extract the produced copy from a chat response.
///
/// The first choice's message content is the artifact; an absent or empty
/// content is a hard failure, not an empty success.
pub fn extract_text(response: ChatResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or(GenerationError::EmptyResult {
            what: "text content",
        })
}

impl GenerationClient {
    /// Generate one piece of commercial copy.
    pub async fn generate_text(&self, request: &TextRequest) -> Result<String, GenerationError> {
        request.validate()?;
        let body = build_chat_request(request);
        let response: ChatResponse = self.post_chat("/chat/completions", &body).await?;
        extract_text(response)
    }
}
