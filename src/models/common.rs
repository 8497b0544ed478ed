use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub name: String,
    pub module_name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    pub url: String,
}

/// Method kind a plugin mounts into the agent sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SandboxMethodType {
    Tool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub method_type: SandboxMethodType,
    /// JSON schema of the call arguments.
    pub parameters: serde_json::Value,
}
