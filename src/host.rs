//! Collaborators provided by the agent host: sandbox path translation and
//! file forwarding, plus the per-call agent context.

use crate::error::{DrawError, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Mount point of the per-chat workspace inside the sandbox container.
pub const SANDBOX_MOUNT: &str = "/app/";

/// Maps a path the agent sees inside its sandbox to a path on the host.
pub trait PathConverter: Send + Sync {
    fn convert_to_host_path(
        &self,
        sandbox_path: &Path,
        chat_key: &str,
        container_key: Option<&str>,
    ) -> Result<PathBuf>;
}

/// Turns a generated image location into whatever the chat surface delivers.
#[async_trait]
pub trait FileForwarder: Send + Sync {
    async fn forward(&self, location: &str) -> Result<String>;
}

/// Resolves sandbox paths under `<root>/<chat_key>/`.
#[derive(Debug, Clone)]
pub struct SandboxPathConverter {
    root: PathBuf,
}

impl SandboxPathConverter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathConverter for SandboxPathConverter {
    fn convert_to_host_path(
        &self,
        sandbox_path: &Path,
        chat_key: &str,
        _container_key: Option<&str>,
    ) -> Result<PathBuf> {
        let raw = sandbox_path.to_string_lossy();
        let relative = Path::new(raw.strip_prefix(SANDBOX_MOUNT).unwrap_or(&*raw));

        if relative.as_os_str().is_empty() {
            return Err(DrawError::InvalidPath("empty path".into()));
        }
        // Only plain components may remain; anything else escapes the chat root.
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(DrawError::InvalidPath(raw.to_string()));
        }
        if chat_key.is_empty() || Path::new(chat_key).components().count() != 1 {
            return Err(DrawError::InvalidPath(format!("bad chat key `{}`", chat_key)));
        }

        Ok(self.root.join(chat_key).join(relative))
    }
}

/// Hands the location back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughForwarder;

#[async_trait]
impl FileForwarder for PassthroughForwarder {
    async fn forward(&self, location: &str) -> Result<String> {
        Ok(location.to_string())
    }
}

/// Per-invocation context the host passes to every tool call.
#[derive(Clone)]
pub struct AgentCtx {
    chat_key: String,
    container_key: Option<String>,
    fs: Arc<dyn FileForwarder>,
}

impl AgentCtx {
    pub fn new(chat_key: impl Into<String>, fs: Arc<dyn FileForwarder>) -> Self {
        Self {
            chat_key: chat_key.into(),
            container_key: None,
            fs,
        }
    }

    pub fn with_container_key(mut self, container_key: impl Into<String>) -> Self {
        self.container_key = Some(container_key.into());
        self
    }

    pub fn chat_key(&self) -> &str {
        &self.chat_key
    }

    pub fn container_key(&self) -> Option<&str> {
        self.container_key.as_deref()
    }

    pub fn fs(&self) -> &dyn FileForwarder {
        self.fs.as_ref()
    }
}

impl std::fmt::Debug for AgentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentCtx")
            .field("chat_key", &self.chat_key)
            .field("container_key", &self.container_key)
            .finish_non_exhaustive()
    }
}
