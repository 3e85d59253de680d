use crate::error::{CanvasError, Result};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};

/// One synchronous `InvokeModel` round trip: JSON body in, raw response body out.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>>;
}

#[derive(Clone)]
pub struct BedrockInvoker {
    client: Client,
}

impl BedrockInvoker {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelInvoker for BedrockInvoker {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                log::error!("Bedrock InvokeModel error details: {:?}", e);

                if let Some(service_error) = e.as_service_error() {
                    log::error!("Service error code: {:?}", service_error.code());
                    CanvasError::AwsServiceError(
                        service_error
                            .message()
                            .map(str::to_string)
                            .unwrap_or_else(|| {
                                service_error.code().unwrap_or("unknown").to_string()
                            }),
                    )
                } else {
                    CanvasError::AwsError(e.to_string())
                }
            })?;

        Ok(response.body.into_inner())
    }
}
