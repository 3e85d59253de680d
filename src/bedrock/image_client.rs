use crate::{
    bedrock::invoker::ModelInvoker,
    error::{CanvasError, Result},
    models::{GeneratedImage, GenerationRequest, NovaCanvasResponse, MAX_SEED},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::{Arc, Mutex};

pub const NO_IMAGE_MESSAGE: &str = "No image returned from model.";

#[derive(Clone)]
pub struct ImageClient {
    invoker: Arc<dyn ModelInvoker>,
    model_id: String,
    rng: Arc<Mutex<StdRng>>,
}

impl ImageClient {
    pub fn new(invoker: Arc<dyn ModelInvoker>, model_id: impl Into<String>) -> Self {
        Self {
            invoker,
            model_id: model_id.into(),
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Pins the seed generator so the sequence of request seeds is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Draws a seed uniformly from `0..=MAX_SEED`.
    pub fn next_seed(&self) -> u32 {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..=MAX_SEED),
            Err(poisoned) => poisoned.into_inner().gen_range(0..=MAX_SEED),
        }
    }

    /// Generates one image for `prompt`. The prompt is sent as given; callers
    /// reject blank prompts before getting here.
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        let request = GenerationRequest::new(prompt, self.next_seed());

        let request_json = serde_json::to_vec(&request.to_payload())
            .map_err(|e| CanvasError::SerializationError(e.to_string()))?;

        log::info!(
            "Generating image with model: {} (seed {})",
            self.model_id,
            request.seed
        );
        log::debug!("Prompt: {}", request.prompt);

        let response_bytes = self
            .invoker
            .invoke_model(&self.model_id, request_json)
            .await?;

        let image_data = extract_image(&response_bytes)?;

        Ok(GeneratedImage {
            image_data,
            seed: request.seed,
            model: self.model_id.clone(),
        })
    }
}

/// Pulls the first base64 image out of a raw Nova Canvas response body.
pub fn extract_image(response_bytes: &[u8]) -> Result<String> {
    let response_str = std::str::from_utf8(response_bytes)
        .map_err(|e| CanvasError::ResponseError(e.to_string()))?;

    let nova_response: NovaCanvasResponse = serde_json::from_str(response_str)
        .map_err(|e| CanvasError::ResponseError(e.to_string()))?;

    if let Some(error) = nova_response.error.filter(|e| !e.is_empty()) {
        return Err(CanvasError::ResponseError(error));
    }

    let image = nova_response
        .images
        .into_iter()
        .next()
        .ok_or_else(|| CanvasError::ResponseError(NO_IMAGE_MESSAGE.into()))?;

    STANDARD
        .decode(image.as_bytes())
        .map_err(|e| CanvasError::ResponseError(format!("Invalid image data: {}", e)))?;

    Ok(image)
}
