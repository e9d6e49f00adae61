// error.rs — error types shared by the viewer plumbing

use std::path::PathBuf;

use thiserror::Error;

/// Failures while negotiating an immersive session with the presentation device.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("immersive sessions are not supported by this device")]
    Unsupported,
    #[error("an immersive session is already active")]
    AlreadyActive,
    #[error("presentation device error: {0}")]
    Device(String),
}

/// Everything that can go wrong outside the orientation controller.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to acquire GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;
