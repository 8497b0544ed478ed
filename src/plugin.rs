//! Registration surface consumed by the agent host: plugin metadata, the
//! configuration schema, the mounted `绘图` tool and the cleanup hook.

use crate::{
    config::{DrawConfig, ModelGroupRegistry, ModelMode},
    error::{DrawError, Result},
    host::{AgentCtx, PathConverter},
    models::{DrawArgs, DrawRequest, PluginMetadata, SandboxMethodType, ToolDefinition},
    openai::ImageRequestAdapter,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub const TOOL_NAME: &str = "绘图";
pub const TOOL_DESCRIPTION: &str = "支持文生图和图生图";

const PROMPT_DOC: &str = "Natural language description of the image you want to create. (Only supports English) \
Suggested elements to include: type of drawing (character setting, landscape, comics...), what to draw, \
what they are doing, the scene, the overall mood, a detailed description or story (recommended for comics), \
and the art style (illustration, watercolor...).";

/// A callable mounted into the agent's sandbox.
#[async_trait]
pub trait SandboxTool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn call(&self, ctx: &AgentCtx, args: Value) -> Result<String>;

    fn name(&self) -> String {
        self.definition().name
    }
}

pub struct DrawTool {
    adapter: Arc<ImageRequestAdapter>,
}

impl DrawTool {
    pub fn new(adapter: Arc<ImageRequestAdapter>) -> Self {
        Self { adapter }
    }

    pub async fn draw(&self, ctx: &AgentCtx, request: DrawRequest) -> Result<String> {
        self.adapter.generate(ctx, request).await
    }
}

#[async_trait]
impl SandboxTool for DrawTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: TOOL_NAME.to_string(),
            description: TOOL_DESCRIPTION.to_string(),
            method_type: SandboxMethodType::Tool,
            parameters: json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": PROMPT_DOC
                    },
                    "size": {
                        "type": "string",
                        "default": "1024x1024",
                        "description": "Image dimensions (e.g. \"1024x1024\" square, \"512x768\" portrait, \"768x512\" landscape)"
                    },
                    "guidance_scale": {
                        "type": "number",
                        "default": 7.5,
                        "description": "Lower is more random, higher follows the prompt more closely (0 to 20)"
                    },
                    "refer_image": {
                        "type": "string",
                        "default": "",
                        "description": "Optional source image path for image reference (style transfer or keeping elements of the original image)"
                    }
                },
                "required": ["prompt"]
            }),
        }
    }

    async fn call(&self, ctx: &AgentCtx, args: Value) -> Result<String> {
        let args: DrawArgs =
            serde_json::from_value(args).map_err(|e| DrawError::InvalidArguments(e.to_string()))?;
        self.draw(ctx, args.into()).await
    }
}

pub struct DrawPlugin {
    metadata: PluginMetadata,
    tool: Arc<DrawTool>,
}

impl DrawPlugin {
    pub fn new(
        config: DrawConfig,
        registry: Arc<dyn ModelGroupRegistry>,
        paths: Arc<dyn PathConverter>,
    ) -> Self {
        let adapter = Arc::new(ImageRequestAdapter::new(config, registry, paths));
        Self {
            metadata: Self::default_metadata(),
            tool: Arc::new(DrawTool::new(adapter)),
        }
    }

    fn default_metadata() -> PluginMetadata {
        PluginMetadata {
            name: "ai_paint_siliconcloud".to_string(),
            module_name: "ai_paint_siliconcloud".to_string(),
            description: "AI绘画（SiliconCloud定制版本)".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            author: "greenhandzdl".to_string(),
            url: "https://github.com/greenhandzdl/ai_paint_siliconcloud".to_string(),
        }
    }

    pub fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    pub fn draw_tool(&self) -> Arc<DrawTool> {
        Arc::clone(&self.tool)
    }

    pub fn tools(&self) -> Vec<Arc<dyn SandboxTool>> {
        vec![self.tool.clone() as Arc<dyn SandboxTool>]
    }

    /// Field descriptors the host renders as the plugin's settings form.
    pub fn config_schema() -> Value {
        let defaults = DrawConfig::default();
        let modes: Vec<&str> = ModelMode::ALL.iter().map(ModelMode::as_str).collect();
        let labels: Vec<&str> = ModelMode::ALL.iter().map(ModelMode::label).collect();
        json!({
            "model_group_name": {
                "type": "string",
                "title": "绘图模型组",
                "default": defaults.model_group_name,
                "description": "主要使用的绘图模型组，可在 `系统配置` -> `模型组` 选项卡配置",
                "ref_model_groups": true,
                "required": true,
                "model_type": "draw"
            },
            "call_mode": {
                "type": "string",
                "title": "绘图模型调用格式",
                "default": defaults.call_mode.as_str(),
                "enum": modes,
                "enum_labels": labels,
                "description": "只有图像生成模式可用"
            },
            "inference_steps": {
                "type": "integer",
                "title": "模型推理步数",
                "default": defaults.inference_steps,
                "description": "num_inference_steps sent with every request"
            },
            "use_system_role": {
                "type": "boolean",
                "title": "是否使用系统角色",
                "default": defaults.use_system_role,
                "description": "只对聊天模式下的模型调用有效，如果模型不支持系统消息请关闭该选项"
            },
            "use_streaming": {
                "type": "boolean",
                "title": "聊天模式使用流式 API",
                "default": defaults.use_streaming,
                "description": "部分模型需要在聊天模式下启用流式 API 才能正常工作"
            },
            "timeout_seconds": {
                "type": "integer",
                "title": "绘图超时时间",
                "default": defaults.timeout_seconds,
                "description": "单位: 秒"
            }
        })
    }

    pub async fn cleanup(&self) {
        log::debug!("🧹 {} cleaned up", self.metadata.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelGroups;
    use crate::host::{PassthroughForwarder, SandboxPathConverter};

    fn plugin() -> DrawPlugin {
        DrawPlugin::new(
            DrawConfig::default(),
            Arc::new(ModelGroups::new()),
            Arc::new(SandboxPathConverter::new("/tmp")),
        )
    }

    #[test]
    fn test_metadata() {
        let plugin = plugin();
        assert_eq!(plugin.metadata().module_name, "ai_paint_siliconcloud");
        assert_eq!(plugin.metadata().version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_tool_definition() {
        let tools = plugin().tools();
        assert_eq!(tools.len(), 1);
        let def = tools[0].definition();
        assert_eq!(def.name, "绘图");
        assert_eq!(def.method_type, SandboxMethodType::Tool);
        assert_eq!(def.parameters["required"], json!(["prompt"]));
        assert_eq!(def.parameters["properties"]["size"]["default"], "1024x1024");
        assert_eq!(def.parameters["properties"]["guidance_scale"]["default"], 7.5);
        assert_eq!(tools[0].name(), "绘图");
    }

    #[test]
    fn test_config_schema() {
        let schema = DrawPlugin::config_schema();
        assert_eq!(schema["model_group_name"]["default"], "default-draw-chat");
        assert_eq!(schema["model_group_name"]["model_type"], "draw");
        assert_eq!(schema["call_mode"]["default"], "image-generation");
        assert_eq!(
            schema["call_mode"]["enum"],
            json!(["auto", "image-generation", "chat-mode"])
        );
        assert_eq!(schema["inference_steps"]["default"], 20);
        assert_eq!(schema["timeout_seconds"]["default"], 300);
    }

    #[tokio::test]
    async fn test_call_rejects_malformed_args() {
        let plugin = plugin();
        let ctx = AgentCtx::new("chat", Arc::new(PassthroughForwarder));
        let err = plugin.tools()[0]
            .call(&ctx, json!({"size": "1024x1024"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DrawError::InvalidArguments(_)));
        plugin.cleanup().await;
    }
}
