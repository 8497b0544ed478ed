use serde::{Deserialize, Serialize};

pub const DEFAULT_SIZE: &str = "1024x1024";
pub const DEFAULT_GUIDANCE_SCALE: f64 = 7.5;
pub const BATCH_SIZE: u32 = 1;
pub const MAX_SEED: u64 = 9_999_999_999;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    pub prompt: String,
    pub size: String,
    pub guidance_scale: f64,
    pub refer_image: Option<String>,
}

impl DrawRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            size: DEFAULT_SIZE.to_string(),
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            refer_image: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_guidance_scale(mut self, guidance_scale: f64) -> Self {
        self.guidance_scale = guidance_scale;
        self
    }

    /// An empty path means no reference image.
    pub fn with_refer_image(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.refer_image = if path.is_empty() { None } else { Some(path) };
        self
    }
}

/// Tool-call arguments as the agent sends them.
#[derive(Debug, Clone, Deserialize)]
pub struct DrawArgs {
    pub prompt: String,
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
    #[serde(default)]
    pub refer_image: String,
}

fn default_size() -> String {
    DEFAULT_SIZE.to_string()
}

fn default_guidance_scale() -> f64 {
    DEFAULT_GUIDANCE_SCALE
}

impl From<DrawArgs> for DrawRequest {
    fn from(args: DrawArgs) -> Self {
        DrawRequest::new(args.prompt)
            .with_size(args.size)
            .with_guidance_scale(args.guidance_scale)
            .with_refer_image(args.refer_image)
    }
}

/// Body of `POST /images/generations`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationBody {
    pub model: String,
    pub prompt: String,
    pub image_size: String,
    pub batch_size: u32,
    pub seed: u64,
    pub num_inference_steps: u32,
    pub guidance_scale: f64,
}

#[derive(Debug, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImage {
    pub url: Option<String>,
}

impl ImageGenerationResponse {
    /// `data[0].url`, when present and non-empty.
    pub fn first_url(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|image| image.url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args: DrawArgs = serde_json::from_value(serde_json::json!({"prompt": "a cat"})).unwrap();
        let request = DrawRequest::from(args);
        assert_eq!(request.size, "1024x1024");
        assert_eq!(request.guidance_scale, 7.5);
        assert_eq!(request.refer_image, None);
    }

    #[test]
    fn test_first_url() {
        let parse = |v: serde_json::Value| -> ImageGenerationResponse { serde_json::from_value(v).unwrap() };
        assert_eq!(
            parse(serde_json::json!({"data": [{"url": "https://example/img.png"}]})).first_url(),
            Some("https://example/img.png")
        );
        assert_eq!(parse(serde_json::json!({"data": [{"url": ""}]})).first_url(), None);
        assert_eq!(parse(serde_json::json!({"data": []})).first_url(), None);
        assert_eq!(parse(serde_json::json!({"images": []})).first_url(), None);
    }

    #[test]
    fn test_body_carries_exactly_the_contract_fields() {
        let body = ImageGenerationBody {
            model: "Kolors".into(),
            prompt: "a cat".into(),
            image_size: DEFAULT_SIZE.into(),
            batch_size: BATCH_SIZE,
            seed: 42,
            num_inference_steps: 20,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
        };
        let value = serde_json::to_value(&body).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "batch_size",
                "guidance_scale",
                "image_size",
                "model",
                "num_inference_steps",
                "prompt",
                "seed"
            ]
        );
        assert_eq!(value["batch_size"], 1);
    }
}
