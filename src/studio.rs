use crate::{
    bedrock::ImageClient,
    error::{CanvasError, Result},
    logger,
    models::GeneratedImage,
    session::{Phase, SessionState},
};
use async_trait::async_trait;

pub const EMPTY_PROMPT_WARNING: &str = "Please enter a prompt.";

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage>;
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        ImageClient::generate(self, prompt).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Prompt rejected before any call was made.
    Warning(String),
    /// The call or the response decoding failed; the session is untouched.
    Failed(String),
    Generated {
        image_data: String,
        latency_seconds: f64,
        seed: u32,
    },
}

pub fn validate_prompt(prompt: &str) -> Result<&str> {
    if prompt.trim().is_empty() {
        return Err(CanvasError::ValidationError(EMPTY_PROMPT_WARNING.into()));
    }
    Ok(prompt)
}

/// Runs one submit: validate, call the generator once, and record the image,
/// its latency and its cost in `session` on success. The submitted text is
/// never written to the session's selected prompt.
pub async fn submit(
    session: &mut SessionState,
    generator: &dyn ImageGenerator,
    prompt: &str,
) -> SubmitOutcome {
    let prompt = match validate_prompt(prompt) {
        Ok(prompt) => prompt,
        Err(e) => {
            log::warn!("Rejected submit: {}", e);
            session.set_phase(Phase::Idle);
            return SubmitOutcome::Warning(e.message().to_string());
        }
    };

    session.set_phase(Phase::Generating);

    let timer = logger::timer("image generation");
    let result = generator.generate(prompt).await;
    let latency_seconds = timer.elapsed().as_secs_f64();
    drop(timer);

    session.set_phase(Phase::Displaying);

    match result {
        Ok(image) => {
            log::info!(
                "Image generated in {:.2}s (seed {}, {} images this session)",
                latency_seconds,
                image.seed,
                session.gallery().len() + 1
            );
            session.append_result(image.image_data.clone(), latency_seconds);
            SubmitOutcome::Generated {
                image_data: image.image_data,
                latency_seconds,
                seed: image.seed,
            }
        }
        Err(e) => {
            log::error!("Image generation failed after {:.2}s: {}", latency_seconds, e);
            SubmitOutcome::Failed(e.message().to_string())
        }
    }
}
