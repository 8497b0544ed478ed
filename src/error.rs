use std::path::PathBuf;
use thiserror::Error;

/// Message returned to the agent when the endpoint answers without an image.
pub const NO_IMAGE_CONTENT_HINT: &str = "No image content found in image generation AI response. You can adjust the prompt and try again. Make sure the prompt is clear and detailed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Filesystem,
    Remote,
    Response,
    Tool,
}

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("Configuration error: draw model group `{0}` is not configured")]
    UnknownModelGroup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read reference image {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid sandbox path: {0}")]
    InvalidPath(String),

    #[error("Image API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Response error: {0}")]
    Response(String),

    #[error("{}", NO_IMAGE_CONTENT_HINT)]
    NoImageContent,

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Not implemented: {0}")]
    Unimplemented(String),

    #[error("File forwarding failed: {0}")]
    Forward(String),
}

impl DrawError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownModelGroup(_) | Self::Config(_) | Self::Unimplemented(_) => {
                ErrorKind::Configuration
            }
            Self::Io { .. } | Self::InvalidPath(_) => ErrorKind::Filesystem,
            Self::Api { .. } | Self::Network(_) | Self::Forward(_) => ErrorKind::Remote,
            Self::Response(_) | Self::NoImageContent => ErrorKind::Response,
            Self::InvalidArguments(_) => ErrorKind::Tool,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DrawError>;
