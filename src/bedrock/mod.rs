pub mod image_client;
pub mod invoker;

use crate::{config::BedrockConfig, error::Result};
use aws_config::BehaviorVersion;
use aws_sdk_bedrockruntime::{
    config::{Credentials, Region},
    Client,
};
use std::sync::Arc;

pub use image_client::ImageClient;
pub use invoker::{BedrockInvoker, ModelInvoker};

#[derive(Clone)]
pub struct BedrockClient {
    image_client: ImageClient,
}

impl BedrockClient {
    pub async fn new(bedrock_config: BedrockConfig) -> Result<Self> {
        let region = Region::new(bedrock_config.region_or_default().to_string());

        let aws_config = if let (Some(access_key), Some(secret_key)) =
            (&bedrock_config.access_key, &bedrock_config.secret_key)
        {
            // A missing session token is left out rather than defaulted.
            aws_config::defaults(BehaviorVersion::latest())
                .credentials_provider(Credentials::new(
                    access_key,
                    secret_key,
                    bedrock_config.session_token.clone(),
                    None,
                    "rcanvas",
                ))
                .region(region)
                .load()
                .await
        } else {
            log::warn!("No static AWS credentials configured, using the default credential chain");
            aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await
        };

        let client = Client::new(&aws_config);
        let invoker = Arc::new(BedrockInvoker::new(client));

        Ok(Self::with_invoker(
            invoker,
            bedrock_config.model_or_default(),
        ))
    }

    /// Builds a client over any invoker, e.g. a fake in tests.
    pub fn with_invoker(invoker: Arc<dyn ModelInvoker>, model_id: &str) -> Self {
        Self {
            image_client: ImageClient::new(invoker, model_id),
        }
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}
