use crate::{
    config::{DrawConfig, ModelGroup},
    error::{DrawError, Result},
    models::{ImageGenerationBody, ImageGenerationResponse},
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client,
};

/// One-shot client for an OpenAI-compatible `/images/generations` endpoint.
///
/// Built per call so concurrent draws never share a connection pool. The
/// overall `timeout` also bounds the pool and write phases.
#[derive(Debug, Clone)]
pub struct ImageClient {
    client: Client,
}

impl ImageClient {
    pub fn new(config: &DrawConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.timeout())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client })
    }

    fn headers(group: &ModelGroup) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", group.api_key))
            .map_err(|_| DrawError::Config("API key contains invalid header characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Sends the request and returns `data[0].url`.
    pub async fn generate(&self, group: &ModelGroup, body: &ImageGenerationBody) -> Result<String> {
        let url = group.generations_url();
        log::info!("Generating image with model: {}", body.model);

        let response = self
            .client
            .post(&url)
            .headers(Self::headers(group)?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            log::error!("❌ Image API returned {}: {}", status, text);
            return Err(DrawError::api(status.as_u16(), text));
        }

        let text = response.text().await?;
        let parsed: ImageGenerationResponse = serde_json::from_str(&text)
            .map_err(|e| DrawError::Response(format!("{}: {}", e, text)))?;

        match parsed.first_url() {
            Some(image_url) => Ok(image_url.to_string()),
            None => {
                log::warn!("⚠️  Image API response carried no image url: {}", text);
                Err(DrawError::NoImageContent)
            }
        }
    }
}
