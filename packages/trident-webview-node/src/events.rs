use napi::threadsafe_function::{ErrorStrategy, ThreadsafeFunction};

/// Callback for document title changes.
pub type TitleUpdatedCallback = ThreadsafeFunction<String, ErrorStrategy::Fatal>;

/// Callback for a finished top-level load: (error code, description), both
/// absent on success.
pub type StopLoadingCallback = ThreadsafeFunction<Option<(i32, String)>, ErrorStrategy::Fatal>;

/// Callback for `window.external.post(message)`.
pub type StringMessageCallback = ThreadsafeFunction<String, ErrorStrategy::Fatal>;

/// One-shot callback for `evaluateJavaScript`: JSON result or error text.
pub type EvaluationCallback = ThreadsafeFunction<Result<String, String>, ErrorStrategy::Fatal>;

/// Stored event handlers for a webview.
#[derive(Default)]
pub struct WebViewEventHandlers {
    pub on_page_title_updated: Option<TitleUpdatedCallback>,
    pub on_did_stop_loading: Option<StopLoadingCallback>,
    pub on_string_message: Option<StringMessageCallback>,
}

impl WebViewEventHandlers {
    pub fn new() -> Self {
        Self::default()
    }
}
