use rcanvas::{logger, server, BedrockClient, Config};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env()?;
    logger::init_with_config(logger::LoggerConfig::from_app_config(&config))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &config.host,
        config.port,
    );
    logger::log_config_info(&config);

    log::info!("🔄 Creating Bedrock client...");
    let client = match BedrockClient::new(config.bedrock.clone()).await {
        Ok(client) => {
            log::info!("✅ Bedrock client ready");
            client
        }
        Err(e) => {
            log::error!("❌ Failed to initialize Bedrock client: {}", e);
            return Err(e.into());
        }
    };

    server::run(&config, Arc::new(client.image().clone())).await?;

    log::info!("👋 Studio stopped");
    Ok(())
}
