use crate::error::{DrawError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL_GROUP: &str = "default-draw-chat";

/// How the draw model is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelMode {
    Auto,
    ImageGeneration,
    ChatMode,
}

impl ModelMode {
    pub const ALL: [ModelMode; 3] = [
        ModelMode::Auto,
        ModelMode::ImageGeneration,
        ModelMode::ChatMode,
    ];

    /// Option label shown in the host's configuration UI.
    pub fn label(&self) -> &'static str {
        match self {
            ModelMode::Auto => "自动选择（暂不可用）",
            ModelMode::ImageGeneration => "图像生成",
            ModelMode::ChatMode => "聊天模式（暂不可用）",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelMode::Auto => "auto",
            ModelMode::ImageGeneration => "image-generation",
            ModelMode::ChatMode => "chat-mode",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ModelMode::ImageGeneration)
    }
}

impl Default for ModelMode {
    fn default() -> Self {
        ModelMode::ImageGeneration
    }
}

impl FromStr for ModelMode {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        ModelMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s) || mode.label() == s)
            .ok_or_else(|| DrawError::Config(format!("unknown model mode `{}`", s)))
    }
}

/// Plugin configuration, loaded once at mount and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub model_group_name: String,
    pub call_mode: ModelMode,
    pub inference_steps: u32,
    /// Only meaningful for chat mode.
    pub use_system_role: bool,
    /// Only meaningful for chat mode.
    pub use_streaming: bool,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            model_group_name: DEFAULT_MODEL_GROUP.to_string(),
            call_mode: ModelMode::ImageGeneration,
            inference_steps: 20,
            use_system_role: false,
            use_streaming: false,
            timeout_seconds: 300,
            connect_timeout_seconds: 10,
        }
    }
}

impl DrawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let model_group_name = env::var("DRAW_MODEL_GROUP")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.model_group_name);
        let call_mode = env::var("DRAW_MODEL_MODE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.call_mode);
        let inference_steps = env::var("DRAW_NUM_INFERENCE_STEPS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.inference_steps);
        let use_system_role = env::var("DRAW_USE_SYSTEM_ROLE")
            .ok()
            .map_or(defaults.use_system_role, |val| val == "true");
        let use_streaming = env::var("DRAW_STREAM_MODE")
            .ok()
            .map_or(defaults.use_streaming, |val| val == "true");
        let timeout_seconds = env::var("DRAW_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timeout_seconds);

        DrawConfig {
            model_group_name,
            call_mode,
            inference_steps,
            use_system_role,
            use_streaming,
            timeout_seconds,
            connect_timeout_seconds: defaults.connect_timeout_seconds,
        }
    }

    pub fn with_model_group(mut self, name: impl Into<String>) -> Self {
        self.model_group_name = name.into();
        self
    }

    pub fn with_call_mode(mut self, mode: ModelMode) -> Self {
        self.call_mode = mode;
        self
    }

    pub fn with_inference_steps(mut self, steps: u32) -> Self {
        self.inference_steps = steps;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout_seconds = seconds;
        self
    }

    pub fn with_system_role(mut self, enabled: bool) -> Self {
        self.use_system_role = enabled;
        self
    }

    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.use_streaming = enabled;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

/// A named endpoint + credentials bundle owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelGroup {
    pub base_url: String,
    pub api_key: String,
    #[serde(alias = "chat_model")]
    pub model_identifier: String,
}

impl ModelGroup {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model_identifier: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model_identifier: model_identifier.into(),
        }
    }

    pub fn generations_url(&self) -> String {
        format!("{}/images/generations", self.base_url.trim_end_matches('/'))
    }
}

/// Typed access to the host's model-group store.
pub trait ModelGroupRegistry: Send + Sync {
    fn lookup(&self, name: &str) -> Result<ModelGroup>;
}

#[derive(Debug, Clone, Default)]
pub struct ModelGroups {
    groups: HashMap<String, ModelGroup>,
}

impl ModelGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, name: impl Into<String>, group: ModelGroup) -> Self {
        self.groups.insert(name.into(), group);
        self
    }

    /// Parses a `{ "<name>": { "base_url", "api_key", "model_identifier" } }` map.
    pub fn from_json(json: &str) -> Result<Self> {
        let groups: HashMap<String, ModelGroup> = serde_json::from_str(json)
            .map_err(|e| DrawError::Config(format!("invalid model groups: {}", e)))?;
        Ok(Self { groups })
    }

    pub fn from_env() -> Self {
        let name = env::var("DRAW_MODEL_GROUP")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL_GROUP.to_string());

        match (
            env::var("DRAW_BASE_URL"),
            env::var("DRAW_API_KEY"),
            env::var("DRAW_MODEL"),
        ) {
            (Ok(base_url), Ok(api_key), Ok(model)) => {
                Self::new().insert(name, ModelGroup::new(base_url, api_key, model))
            }
            _ => {
                log::warn!("⚠️  DRAW_BASE_URL / DRAW_API_KEY / DRAW_MODEL not all set, no model group loaded");
                Self::new()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl ModelGroupRegistry for ModelGroups {
    fn lookup(&self, name: &str) -> Result<ModelGroup> {
        self.groups
            .get(name)
            .cloned()
            .ok_or_else(|| DrawError::UnknownModelGroup(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DrawConfig::default();
        assert_eq!(config.model_group_name, "default-draw-chat");
        assert_eq!(config.call_mode, ModelMode::ImageGeneration);
        assert_eq!(config.inference_steps, 20);
        assert_eq!(config.timeout(), Duration::from_secs(300));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert!(!config.use_system_role);
        assert!(!config.use_streaming);
    }

    #[test]
    fn test_model_mode_parsing() {
        assert_eq!("图像生成".parse::<ModelMode>().unwrap(), ModelMode::ImageGeneration);
        assert_eq!("chat-mode".parse::<ModelMode>().unwrap(), ModelMode::ChatMode);
        assert_eq!("AUTO".parse::<ModelMode>().unwrap(), ModelMode::Auto);
        assert!("dall-e".parse::<ModelMode>().is_err());
        assert_eq!(
            serde_json::to_value(ModelMode::ImageGeneration).unwrap(),
            serde_json::json!("image-generation")
        );
    }

    #[test]
    fn test_generations_url_trims_trailing_slash() {
        let group = ModelGroup::new("https://api.example.com/v1/", "k", "Kolors");
        assert_eq!(
            group.generations_url(),
            "https://api.example.com/v1/images/generations"
        );
    }

    #[test]
    fn test_registry_lookup() {
        let groups = ModelGroups::new().insert("draw", ModelGroup::new("http://x", "k", "m"));
        assert_eq!(groups.lookup("draw").unwrap().model_identifier, "m");
        assert!(matches!(
            groups.lookup("missing"),
            Err(DrawError::UnknownModelGroup(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_registry_from_json() {
        let groups = ModelGroups::from_json(
            r#"{"kolors": {"base_url": "https://api.siliconflow.cn/v1", "api_key": "sk", "chat_model": "Kwai-Kolors/Kolors"}}"#,
        )
        .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups.lookup("kolors").unwrap().model_identifier,
            "Kwai-Kolors/Kolors"
        );
        assert!(ModelGroups::from_json("[]").is_err());
    }
}
