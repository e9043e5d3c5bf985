//! Embedded web view on top of the Windows Trident (`WebBrowser`) control.
//!
//! The control is hosted over OLE in-place activation. This crate provides:
//! - the activation adapter and its teardown ([`adapter`])
//! - the event sink that turns engine notifications into host callbacks
//!   ([`events`])
//! - the `external` object pages use to call the host ([`bridge`])
//! - the preload script bundle injected after each navigation ([`preload`])
//! - keyboard accelerator routing from the host message loop ([`router`])
//! - the [`WebView`] façade tying them together
//!
//! Everything runs on the UI thread. The engine binding sits behind
//! [`BrowserControl`] and [`WindowHost`]; the Windows implementation is in
//! [`platform`].

pub mod adapter;
pub mod bridge;
pub mod callbacks;
pub mod engine;
pub mod error;
pub mod events;
pub mod navigation;
pub mod options;
pub mod platform;
pub mod preload;
pub mod router;
pub mod site;
mod webview;

#[cfg(test)]
mod testing;

pub use adapter::{AdapterState, SetupStep, TeardownStep};
pub use callbacks::{EvaluationCallback, EventCallbacks, LoadError};
pub use engine::{BrowserControl, InputMessage, Rect, ScriptValue, WindowHandle, WindowHost};
pub use error::{EngineError, Result, WebViewError};
pub use navigation::HttpHeader;
pub use options::WebViewOptions;
pub use webview::WebView;

#[cfg(target_os = "windows")]
pub use platform::windows::{initialize, pump_pending, TridentWebView};
