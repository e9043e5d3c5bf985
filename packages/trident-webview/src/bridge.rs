//! The `external` object seen by page script.
//!
//! Two members, resolved by exact name to fixed ids:
//! `external.post(message)` and `external.drag()`.

use tracing::debug;

use crate::engine::{DispId, InvokeArg, InvokeKind, WindowHandle, WindowHost};

pub const POST_DISPID: DispId = 0x1000;
pub const POST_NAME: &str = "post";
pub const DRAG_DISPID: DispId = 0x1001;
pub const DRAG_NAME: &str = "drag";

/// Resolve a member name. `None` means "member not found".
pub fn member_id(name: &str) -> Option<DispId> {
    match name {
        POST_NAME => Some(POST_DISPID),
        DRAG_NAME => Some(DRAG_DISPID),
        _ => None,
    }
}

fn member_name(dispid: DispId) -> Option<&'static str> {
    match dispid {
        POST_DISPID => Some(POST_NAME),
        DRAG_DISPID => Some(DRAG_NAME),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    Post(String),
    Drag,
}

impl BridgeCall {
    /// Decode a call on the bridge. `None` for ids that are not bridge
    /// members, for property access to a member and for `post` without a
    /// string argument.
    pub fn decode(dispid: DispId, kind: InvokeKind, args: &[InvokeArg]) -> Option<Self> {
        if kind != InvokeKind::Method {
            if member_name(dispid).is_some() {
                debug!(dispid, ?kind, "bridge member accessed as a property");
            }
            return None;
        }
        match dispid {
            POST_DISPID => match args.first().and_then(InvokeArg::as_text) {
                Some(message) => Some(BridgeCall::Post(message.to_owned())),
                None => {
                    debug!("external.post called without a string argument");
                    None
                }
            },
            DRAG_DISPID => Some(BridgeCall::Drag),
            _ => None,
        }
    }
}

/// Begin moving the window that contains `container`, as if its caption had
/// been pressed. Does nothing without a top-level ancestor or focus.
pub fn drag(host: &dyn WindowHost, container: WindowHandle) {
    let Some(root) = host.root_ancestor(container) else {
        debug!(?container, "drag ignored: container has no top-level ancestor");
        return;
    };
    if !host.focus(root) {
        debug!(?root, "drag ignored: window did not take focus");
        return;
    }
    host.begin_caption_drag(root);
}
