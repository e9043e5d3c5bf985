use std::path::PathBuf;

use crate::adapter::{AdapterState, SetupStep};

/// A failure reported by the engine binding.
///
/// `code` carries the native status (an `HRESULT` on Windows) so callers can
/// log it; the core never branches on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (0x{code:08X})")]
pub struct EngineError {
    pub code: i32,
    pub message: String,
}

impl EngineError {
    /// Generic failure status (`E_FAIL`).
    pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(Self::E_FAIL, message)
    }
}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for EngineError {
    fn from(e: windows::core::Error) -> Self {
        Self::new(e.code().0, e.message())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WebViewError {
    /// A step of the attach sequence failed. The adapter is unusable.
    #[error("webview setup failed at {step:?}: {source}")]
    Setup {
        step: SetupStep,
        #[source]
        source: EngineError,
    },

    #[error("operation not valid while the adapter is {state:?}")]
    InvalidState { state: AdapterState },

    #[error("webview is not attached to a container window")]
    NotAttached,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to read preload script {path}: {source}")]
    PreloadIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("script evaluation failed: {0}")]
    Script(String),
}

pub type Result<T> = std::result::Result<T, WebViewError>;
