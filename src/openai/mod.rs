pub mod image_client;
pub mod reference;

use crate::{
    config::{DrawConfig, ModelGroup, ModelGroupRegistry},
    error::{DrawError, Result},
    host::{AgentCtx, PathConverter},
    logger,
    models::{DrawRequest, ImageGenerationBody, BATCH_SIZE, MAX_SEED},
};
use rand::Rng;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

pub use image_client::ImageClient;
pub use reference::{ReferenceImage, PLACEHOLDER_DATA_URI};

/// Turns a [`DrawRequest`] into one `/images/generations` call.
#[derive(Clone)]
pub struct ImageRequestAdapter {
    config: DrawConfig,
    registry: Arc<dyn ModelGroupRegistry>,
    paths: Arc<dyn PathConverter>,
}

impl ImageRequestAdapter {
    pub fn new(
        config: DrawConfig,
        registry: Arc<dyn ModelGroupRegistry>,
        paths: Arc<dyn PathConverter>,
    ) -> Self {
        Self {
            config,
            registry,
            paths,
        }
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Draws the image and returns the location produced by the context's forwarder.
    pub async fn generate(&self, ctx: &AgentCtx, request: DrawRequest) -> Result<String> {
        let request_id = Uuid::new_v4().simple().to_string();
        log::info!(
            "🎨 [req:{}] Drawing with model group `{}`: {}",
            request_id,
            self.config.model_group_name,
            request.prompt
        );

        let result = match self.generate_url(ctx, &request).await {
            Ok(url) => ctx.fs().forward(&url).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(location) => log::info!("✅ [req:{}] Image ready: {}", request_id, location),
            Err(e) => log::error!("❌ [req:{}] Drawing failed: {}", request_id, e),
        }
        result
    }

    /// Same as [`generate`](Self::generate) without the forwarding step.
    pub async fn generate_url(&self, ctx: &AgentCtx, request: &DrawRequest) -> Result<String> {
        if !self.config.call_mode.is_available() {
            return Err(DrawError::Unimplemented(format!(
                "model mode `{}` is not supported yet, use `{}`",
                self.config.call_mode.label(),
                crate::config::ModelMode::ImageGeneration.label()
            )));
        }
        if self.config.use_system_role || self.config.use_streaming {
            log::debug!("System role and streaming options only apply to chat mode, ignoring");
        }

        // A reference that cannot be read aborts the draw before any request is sent.
        let reference = self.load_reference(ctx, request).await?;
        log::debug!(
            "Reference image: {} ({} chars)",
            if reference.is_encoded() { "provided" } else { "none" },
            reference.data_uri().len()
        );

        let group = self.registry.lookup(&self.config.model_group_name)?;
        let body = self.build_body(&group, request);
        log::debug!(
            "Image generation request: model={} size={} steps={} guidance={} seed={}",
            body.model,
            body.image_size,
            body.num_inference_steps,
            body.guidance_scale,
            body.seed
        );

        let _timer = logger::timer("image generation");
        ImageClient::new(&self.config)?.generate(&group, &body).await
    }

    /// Resolves and encodes `refer_image`, or returns the placeholder when it is empty.
    pub async fn load_reference(
        &self,
        ctx: &AgentCtx,
        request: &DrawRequest,
    ) -> Result<ReferenceImage> {
        match request.refer_image.as_deref().filter(|p| !p.is_empty()) {
            Some(sandbox_path) => {
                let host_path = self.paths.convert_to_host_path(
                    Path::new(sandbox_path),
                    ctx.chat_key(),
                    ctx.container_key(),
                )?;
                ReferenceImage::load(&host_path).await
            }
            None => Ok(ReferenceImage::None),
        }
    }

    pub fn build_body(&self, group: &ModelGroup, request: &DrawRequest) -> ImageGenerationBody {
        ImageGenerationBody {
            model: group.model_identifier.clone(),
            prompt: request.prompt.clone(),
            image_size: request.size.clone(),
            batch_size: BATCH_SIZE,
            seed: random_seed(),
            num_inference_steps: self.config.inference_steps,
            guidance_scale: request.guidance_scale,
        }
    }
}

fn random_seed() -> u64 {
    rand::thread_rng().gen_range(0..=MAX_SEED)
}
