pub mod bedrock;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod presets;
#[cfg(feature = "server")]
pub mod server;
pub mod session;
pub mod studio;

pub use bedrock::{BedrockClient, BedrockInvoker, ImageClient, ModelInvoker};
pub use config::{BedrockConfig, Config};
pub use error::{CanvasError, Result};
pub use models::*;
pub use session::{Phase, SessionState};
pub use studio::{submit, ImageGenerator, SubmitOutcome};
