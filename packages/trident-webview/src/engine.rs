//! Seams between the adapter and the native world.
//!
//! [`BrowserControl`] is the engine control as the adapter drives it, one
//! method per step of the hosting protocol. [`WindowHost`] covers the few
//! window-manager queries the bridge and the router need. [`SiteHandler`] is
//! the reverse direction: what the native site object calls back into.
//!
//! The Windows binding of all three lives in `platform::windows`.

use std::rc::Weak;

use crate::error::EngineError;
use crate::navigation::NavigateRequest;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Native window handle (`HWND` on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Identity of a browsing-automation facet.
///
/// Two events come from the same control iff their ids are equal. On Windows
/// this is the address of the control's canonical `IUnknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub usize);

/// Connection-point cookie returned by [`BrowserControl::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventToken(pub u32);

/// Numeric member / event identifier (`DISPID`).
pub type DispId = i32;

const WM_KEYFIRST: u32 = 0x0100;
const WM_KEYLAST: u32 = 0x0109;

/// A raw message as pulled off the host message loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputMessage {
    pub target: WindowHandle,
    pub message: u32,
    pub wparam: usize,
    pub lparam: isize,
    pub time: u32,
    pub point: (i32, i32),
}

impl InputMessage {
    pub fn is_keyboard(&self) -> bool {
        (WM_KEYFIRST..=WM_KEYLAST).contains(&self.message)
    }
}

/// One argument of an engine notification or bridge call, in declaration
/// order.
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeArg {
    /// An automation object, reduced to its identity.
    Frame(FrameId),
    Text(String),
    /// Anything the dispatcher has no use for.
    Other,
}

impl InvokeArg {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            InvokeArg::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<FrameId> {
        match self {
            InvokeArg::Frame(id) => Some(*id),
            _ => None,
        }
    }
}

const DISPATCH_METHOD: u16 = 0x1;
const DISPATCH_PROPERTYGET: u16 = 0x2;

/// How a member was reached, from the `wFlags` of an `Invoke` call.
///
/// Script engines set both the method and the property-get bit for an
/// ordinary call, so the method bit wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeKind {
    Method,
    PropertyGet,
    PropertyPut,
}

impl InvokeKind {
    pub fn from_flags(flags: u16) -> Self {
        if flags & DISPATCH_METHOD != 0 {
            InvokeKind::Method
        } else if flags & DISPATCH_PROPERTYGET != 0 {
            InvokeKind::PropertyGet
        } else {
            InvokeKind::PropertyPut
        }
    }
}

/// Result of evaluating a script in the page.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl ScriptValue {
    /// JSON text of the value. `undefined` has no JSON form and maps to
    /// `null`, as `JSON.stringify` does inside arrays.
    pub fn to_json(&self) -> String {
        let value = match self {
            ScriptValue::Undefined | ScriptValue::Null => serde_json::Value::Null,
            ScriptValue::Bool(b) => serde_json::Value::Bool(*b),
            ScriptValue::Number(n) => number_json(*n),
            ScriptValue::String(s) => serde_json::Value::String(s.clone()),
        };
        value.to_string()
    }
}

/// Script numbers are doubles; integral ones print without a fraction, as
/// `JSON.stringify` prints them.
fn number_json(n: f64) -> serde_json::Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// The engine's embeddable browser control.
///
/// Methods take `&self`: the engine may call back into the site while any of
/// them is running, and the callback may in turn call another method here.
/// Implementations keep their interior borrows short for that reason.
pub trait BrowserControl {
    /// Obtain the class factory for the control type.
    fn load_class_factory(&self) -> EngineResult<()>;
    /// Instantiate the control through the factory.
    fn create_instance(&self) -> EngineResult<()>;
    /// Register (`Some`) or clear (`None`) the hosting site.
    fn set_client_site(&self, site: Option<Weak<dyn SiteHandler>>) -> EngineResult<()>;
    /// Mark the control as embedded (or no longer embedded) in a container.
    fn set_contained(&self, contained: bool) -> EngineResult<()>;
    fn activate_in_place(&self, container: WindowHandle, bounds: Rect) -> EngineResult<()>;
    /// Fetch the browsing-automation facet and return its identity.
    fn acquire_automation(&self) -> EngineResult<FrameId>;
    fn acquire_active_object(&self) -> EngineResult<()>;
    fn subscribe(&self) -> EngineResult<EventToken>;
    fn unsubscribe(&self, token: EventToken) -> EngineResult<()>;

    fn stop(&self) -> EngineResult<()>;
    /// Close the current document without prompting the user.
    fn close_document(&self) -> EngineResult<()>;
    fn set_visible(&self, visible: bool) -> EngineResult<()>;
    fn deactivate(&self, container: WindowHandle) -> EngineResult<()>;
    fn close(&self) -> EngineResult<()>;
    /// Sever any remaining native references to the control.
    fn disconnect(&self) -> EngineResult<()>;

    fn set_bounds(&self, bounds: Rect) -> EngineResult<()>;
    /// Apply position and clip rectangles to the in-place object.
    fn set_object_rects(&self, rect: Rect) -> EngineResult<()>;
    fn navigate(&self, request: &NavigateRequest) -> EngineResult<()>;
    fn location_url(&self) -> EngineResult<String>;
    /// Call the page's `eval` with `script` as the only argument.
    fn eval(&self, script: &str) -> EngineResult<ScriptValue>;
    /// Offer a keyboard message to the active object. `true` if consumed.
    fn translate_accelerator(&self, msg: &InputMessage) -> bool;
}

/// Window-manager operations outside the control.
pub trait WindowHost {
    fn client_rect(&self, window: WindowHandle) -> EngineResult<Rect>;
    /// Top-level ancestor of `window`, if any.
    fn root_ancestor(&self, window: WindowHandle) -> Option<WindowHandle>;
    /// Give `window` keyboard focus. `false` if the window manager refused.
    fn focus(&self, window: WindowHandle) -> bool;
    /// Start a native move-drag as if the caption had been pressed.
    fn begin_caption_drag(&self, window: WindowHandle);
    fn is_child(&self, parent: WindowHandle, window: WindowHandle) -> bool;
}

/// Calls made by the native site object into its owner.
pub trait SiteHandler {
    fn container(&self) -> WindowHandle;
    /// Bridge member lookup; `None` is "member not found".
    fn member_id(&self, name: &str) -> Option<DispId>;
    /// One unified entry point for engine notifications and bridge calls.
    fn invoke(&self, dispid: DispId, kind: InvokeKind, args: &[InvokeArg]);
    /// The control asked for a new position rectangle.
    fn position_changed(&self, rect: Rect);
}
