/// Error value carried by `did_stop_loading`.
///
/// The Trident binding only reports successful completions; the type exists
/// so handlers share one signature across backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub code: i32,
    pub description: String,
}

/// Handler for document title changes.
pub type TitleUpdatedCallback = Box<dyn Fn(String)>;

/// Handler for a finished top-level load.
pub type StopLoadingCallback = Box<dyn Fn(Option<LoadError>)>;

/// Handler for `external.post(message)` calls from the page.
pub type StringMessageCallback = Box<dyn Fn(String)>;

/// Result of `evaluate_javascript`: JSON text of the value, or an error
/// description.
pub type EvaluationCallback = Box<dyn FnOnce(std::result::Result<String, String>)>;

/// Host handlers for one webview. Invoked synchronously on the UI thread,
/// possibly re-entrantly.
pub struct EventCallbacks {
    pub on_page_title_updated: TitleUpdatedCallback,
    pub did_stop_loading: StopLoadingCallback,
    pub on_string_message: StringMessageCallback,
}

impl EventCallbacks {
    /// Callbacks that ignore everything.
    pub fn noop() -> Self {
        Self {
            on_page_title_updated: Box::new(|_| {}),
            did_stop_loading: Box::new(|_| {}),
            on_string_message: Box::new(|_| {}),
        }
    }
}

impl std::fmt::Debug for EventCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventCallbacks").finish_non_exhaustive()
    }
}
