//! Image generation with the high-fidelity e-commerce template.

use manaforge_core::artifact::ImagePayload;
use manaforge_core::error::GenerationError;
use manaforge_core::request::ImageRequest;

use crate::backend::GenerationBackend;
use crate::client::GenerationClient;
use crate::retry::{call_with_retry, RetryPolicy};
use crate::wire::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
    InlineData, Part, Tool,
};

/// Wrap the user prompt in the fixed commercial-photography instruction.
///
/// The template constrains the model to preserve the reference subject's
/// shape, labels, colors, and textures while restyling the scene.
pub fn ecommerce_prompt(task: &str) -> String {
    format!(
        "[ECOMMERCE HIGH-FIDELITY MODE]\n\
         Task: {task}.\n\
         Requirement:\n\
         1. ABSOLUTELY PRESERVE all core features of the product/person from the reference image.\n\
         2. DO NOT change shape, labels, colors, or textures of the primary subject.\n\
         3. Style: Commercial high-end photography, professional studio lighting, realistic environment.\n\
         4. Output: 4K resolution, hyper-realistic, sharp focus."
    )
}

/// Build the `generateContent` body for an image generation.
///
/// The content is one user message with a text part plus zero-or-one inline
/// image part. The image-size tier and the web-grounding tool are attached
/// only when the selected model honors them; for other models the fields
/// are omitted from the payload entirely rather than defaulted.
pub fn build_image_request(request: &ImageRequest) -> GenerateContentRequest {
    let mut parts = vec![Part::text(ecommerce_prompt(&request.prompt))];
    if let Some(reference) = &request.reference_image {
        parts.push(Part::inline(InlineData {
            mime_type: reference.mime_type.clone(),
            data: reference.data.clone(),
        }));
    }

    let image_size = request
        .image_size
        .filter(|_| request.model.supports_image_size())
        .map(|size| size.as_str().to_string());

    let tools = request
        .model
        .supports_grounding()
        .then(|| vec![Tool::web_grounding()]);

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: Some(GenerationConfig {
            image_config: Some(ImageConfig {
                aspect_ratio: request.aspect_ratio.as_str().to_string(),
                image_size,
            }),
        }),
        tools,
    }
}

/// Extract the first inline image from a `generateContent` response.
///
/// Scans the first candidate's parts for an inline-data part; its absence
/// is a distinct, user-actionable failure rather than a transport error.
pub fn extract_image(response: GenerateContentResponse) -> Result<ImagePayload, GenerationError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.inline_data))
        .map(|data| ImagePayload {
            mime_type: data.mime_type,
            data: data.data,
        })
        .ok_or(GenerationError::EmptyResult { what: "image data" })
}

impl GenerationClient {
    /// Generate a single image.
    pub async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<ImagePayload, GenerationError> {
        request.validate()?;
        let body = build_image_request(request);
        let response: GenerateContentResponse = self
            .post_model(request.model.as_str(), "generateContent", &body)
            .await?;
        extract_image(response)
    }
}

/// Fan out the request's batch as independent calls and join them all.
///
/// Each call is individually wrapped in the retry policy; the batch
/// resolves only if every call succeeds, matching the single up-front
/// billing of `base_cost * batch_size`.
pub async fn generate_image_batch<B>(
    backend: &B,
    retry: &RetryPolicy,
    request: &ImageRequest,
) -> Result<Vec<ImagePayload>, GenerationError>
where
    B: GenerationBackend + ?Sized,
{
    let count = request.batch_size.max(1);
    let calls = (0..count).map(|_| call_with_retry(retry, || backend.generate_image(request)));
    futures::future::try_join_all(calls).await
}
