use serde::{Deserialize, Serialize};

/// Largest seed Nova Canvas accepts.
pub const MAX_SEED: u32 = 858_993_460;
pub const IMAGE_WIDTH: u32 = 1024;
pub const IMAGE_HEIGHT: u32 = 1024;
pub const IMAGES_PER_REQUEST: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Standard,
}

/// A single text-to-image request. The studio always sends the fixed
/// 1024x1024, one image, standard quality shape built by [`GenerationRequest::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub seed: u32,
    pub quality: Quality,
    pub width: u32,
    pub height: u32,
    pub count: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, seed: u32) -> Self {
        Self {
            prompt: prompt.into(),
            seed,
            quality: Quality::Standard,
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
            count: IMAGES_PER_REQUEST,
        }
    }

    pub fn to_payload(&self) -> NovaCanvasRequest {
        NovaCanvasRequest {
            task_type: "TEXT_IMAGE".to_string(),
            text_to_image_params: TextToImageParams {
                text: self.prompt.clone(),
            },
            image_generation_config: ImageGenerationConfig {
                seed: self.seed,
                quality: self.quality,
                height: self.height,
                width: self.width,
                number_of_images: self.count,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub image_data: String, // Base64 encoded
    pub seed: u32,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NovaCanvasRequest {
    pub task_type: String,
    pub text_to_image_params: TextToImageParams,
    pub image_generation_config: ImageGenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextToImageParams {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    pub seed: u32,
    pub quality: Quality,
    pub height: u32,
    pub width: u32,
    pub number_of_images: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaCanvasResponse {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let payload = GenerationRequest::new("A cyberpunk kangaroo in Sydney", 42).to_payload();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "taskType": "TEXT_IMAGE",
                "textToImageParams": { "text": "A cyberpunk kangaroo in Sydney" },
                "imageGenerationConfig": {
                    "seed": 42,
                    "quality": "standard",
                    "height": 1024,
                    "width": 1024,
                    "numberOfImages": 1
                }
            })
        );
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: NovaCanvasResponse = serde_json::from_str(r#"{"images":["aGk="]}"#).unwrap();
        assert_eq!(response.images, vec!["aGk=".to_string()]);
        assert!(response.error.is_none());

        let response: NovaCanvasResponse =
            serde_json::from_str(r#"{"error":"blocked by content filter"}"#).unwrap();
        assert!(response.images.is_empty());
        assert_eq!(response.error.as_deref(), Some("blocked by content filter"));
    }
}
