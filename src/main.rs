use rdraw::{
    AgentCtx, DrawConfig, DrawPlugin, DrawRequest, ModelGroups, PassthroughForwarder,
    SandboxPathConverter,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_loaded = dotenv::dotenv().is_ok();

    let mut logger_config =
        rdraw::logger::LoggerConfig::development().with_level(rdraw::logger::LogLevel::Debug);
    if let Ok(path) = env::var("DRAW_LOG_FILE") {
        logger_config = logger_config.with_file_output(&path);
    }
    rdraw::logger::init_with_config(logger_config)?;
    if env_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = DrawConfig::from_env();
    rdraw::logger::log_config_info(&config);

    let groups = ModelGroups::from_env();
    if groups.is_empty() {
        log::error!("❌ Set DRAW_BASE_URL, DRAW_API_KEY and DRAW_MODEL to configure a model group");
    }

    let sandbox_root = env::var("DRAW_SANDBOX_ROOT").unwrap_or_else(|_| ".".to_string());
    let plugin = DrawPlugin::new(
        config,
        Arc::new(groups),
        Arc::new(SandboxPathConverter::new(sandbox_root)),
    );
    log::info!(
        "🚀 {} v{} by {}",
        plugin.metadata().name,
        plugin.metadata().version,
        plugin.metadata().author
    );

    let mut args = env::args().skip(1);
    let prompt = args.next().unwrap_or_else(|| {
        "a illustration style cute orange cat napping on a sunny windowsill, watercolor painting style".to_string()
    });
    let mut request = DrawRequest::new(prompt);
    if let Some(size) = args.next() {
        request = request.with_size(size);
    }
    if let Some(refer_image) = args.next() {
        request = request.with_refer_image(refer_image);
    }

    let chat_key = env::var("DRAW_CHAT_KEY").unwrap_or_else(|_| "local".to_string());
    let ctx = AgentCtx::new(chat_key, Arc::new(PassthroughForwarder));

    let result = plugin.draw_tool().draw(&ctx, request).await;
    plugin.cleanup().await;

    println!("{}", result?);
    Ok(())
}
