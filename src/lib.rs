//! AI drawing plugin: exposes a `绘图` tool that sends a prompt (and an
//! optional reference image) to an OpenAI-compatible `/images/generations`
//! endpoint and hands the resulting image location back to the host.

pub mod config;
pub mod error;
pub mod host;
pub mod logger;
pub mod models;
pub mod openai;
pub mod plugin;

pub use config::{DrawConfig, ModelGroup, ModelGroupRegistry, ModelGroups, ModelMode};
pub use error::{DrawError, ErrorKind, Result};
pub use host::{AgentCtx, FileForwarder, PassthroughForwarder, PathConverter, SandboxPathConverter};
pub use models::{DrawArgs, DrawRequest, PluginMetadata, SandboxMethodType, ToolDefinition};
pub use openai::{ImageClient, ImageRequestAdapter, ReferenceImage};
pub use plugin::{DrawPlugin, DrawTool, SandboxTool};
