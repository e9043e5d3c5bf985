//! Event sink: the engine's notification stream and bridge calls, filtered
//! and forwarded to the host callbacks.

use tracing::{debug, warn};

use crate::adapter::{Adapter, AdapterState};
use crate::bridge::{self, BridgeCall};
use crate::engine::{
    BrowserControl, DispId, FrameId, InvokeArg, InvokeKind, ScriptValue, WindowHost,
};
use crate::error::Result;
use crate::preload;

/// `DISPID_TITLECHANGE`
pub const TITLE_CHANGE: DispId = 113;
/// `DISPID_NAVIGATECOMPLETE2`
pub const NAVIGATE_COMPLETE: DispId = 252;
/// `DISPID_DOCUMENTCOMPLETE`
pub const DOCUMENT_COMPLETE: DispId = 259;

/// The notifications the sink acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A navigation finished in `frame`, which may be a sub-frame.
    NavigateComplete { frame: FrameId },
    /// A document finished loading in `frame`, which may be a sub-frame.
    DocumentComplete { frame: FrameId },
    TitleChange(String),
}

impl EngineEvent {
    /// Decode a notification. Unknown ids, and known ids with unexpected
    /// arguments, yield `None`.
    pub fn decode(dispid: DispId, args: &[InvokeArg]) -> Option<Self> {
        let first = args.first();
        match dispid {
            NAVIGATE_COMPLETE => first
                .and_then(InvokeArg::as_frame)
                .map(|frame| EngineEvent::NavigateComplete { frame }),
            DOCUMENT_COMPLETE => first
                .and_then(InvokeArg::as_frame)
                .map(|frame| EngineEvent::DocumentComplete { frame }),
            TITLE_CHANGE => first
                .and_then(InvokeArg::as_text)
                .map(|title| EngineEvent::TitleChange(title.to_owned())),
            _ => None,
        }
    }
}

impl<C, H> Adapter<C, H>
where
    C: BrowserControl + 'static,
    H: WindowHost + 'static,
{
    /// Entry point for everything the engine invokes on the site.
    pub(crate) fn dispatch(&self, dispid: DispId, kind: InvokeKind, args: &[InvokeArg]) {
        let state = self.state();
        if !matches!(state, AdapterState::Activating | AdapterState::Activated) {
            debug!(dispid, ?state, "notification after teardown ignored");
            return;
        }

        if let Some(call) = BridgeCall::decode(dispid, kind, args) {
            match call {
                BridgeCall::Post(message) => (self.callbacks.on_string_message)(message),
                BridgeCall::Drag => {
                    if let Some(container) = self.container() {
                        bridge::drag(&self.host, container);
                    }
                }
            }
            return;
        }

        match EngineEvent::decode(dispid, args) {
            Some(EngineEvent::NavigateComplete { frame }) if self.is_own_frame(frame) => {
                if let Err(e) = self.inject_preload() {
                    warn!(error = %e, "preload injection failed");
                }
            }
            Some(EngineEvent::DocumentComplete { frame }) if self.is_own_frame(frame) => {
                (self.callbacks.did_stop_loading)(None);
            }
            Some(EngineEvent::TitleChange(title)) => (self.callbacks.on_page_title_updated)(title),
            Some(event) => debug!(?event, "sub-frame notification ignored"),
            None => {}
        }
    }

    fn is_own_frame(&self, frame: FrameId) -> bool {
        self.frame() == Some(frame)
    }

    /// Evaluate the shared preload bundle in the page that just navigated.
    pub(crate) fn inject_preload(&self) -> Result<ScriptValue> {
        let bundle = preload::bundle(&self.options.preload_dir)?;
        self.execute_script(&bundle)
    }
}
