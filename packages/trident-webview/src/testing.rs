//! Recording fakes for [`BrowserControl`] and [`WindowHost`].
//!
//! `FakeControl` logs every call, can be told to fail any of them, and can
//! complete navigations synchronously by firing the same notifications the
//! real control sends through its site.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Weak;

use crate::engine::{
    BrowserControl, EngineResult, EventToken, FrameId, InputMessage, InvokeArg, InvokeKind, Rect,
    ScriptValue, SiteHandler, WindowHandle, WindowHost,
};
use crate::error::EngineError;
use crate::events::{DOCUMENT_COMPLETE, NAVIGATE_COMPLETE};
use crate::navigation::NavigateRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ClassFactory,
    CreateInstance,
    SetClientSite(bool),
    SetContained(bool),
    ActivateInPlace(WindowHandle, Rect),
    AcquireAutomation,
    AcquireActiveObject,
    Subscribe,
    Unsubscribe(EventToken),
    Stop,
    CloseDocument,
    SetVisible(bool),
    Deactivate(WindowHandle),
    Close,
    Disconnect,
    SetBounds(Rect),
    SetObjectRects(Rect),
    Navigate(NavigateRequest),
    LocationUrl,
    Eval(String),
    TranslateAccelerator(InputMessage),
}

pub struct FakeControl {
    frame: FrameId,
    calls: RefCell<Vec<Call>>,
    failures: RefCell<Vec<Call>>,
    site: RefCell<Option<Weak<dyn SiteHandler>>>,
    location: RefCell<String>,
    eval_result: RefCell<ScriptValue>,
    eval_fails: Cell<bool>,
    complete_navigations: Cell<bool>,
    consume_accelerators: Cell<bool>,
}

impl FakeControl {
    pub fn new(frame: FrameId) -> Self {
        Self {
            frame,
            calls: RefCell::default(),
            failures: RefCell::default(),
            site: RefCell::new(None),
            location: RefCell::new("about:blank".into()),
            eval_result: RefCell::new(ScriptValue::Undefined),
            eval_fails: Cell::new(false),
            complete_navigations: Cell::new(false),
            consume_accelerators: Cell::new(false),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Scripts passed to `eval`, in order.
    pub fn evaluated(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Eval(script) => Some(script.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn fail_on(&self, call: Call) {
        self.failures.borrow_mut().push(call);
    }

    pub fn fail_eval(&self, fail: bool) {
        self.eval_fails.set(fail);
    }

    pub fn set_eval_result(&self, value: ScriptValue) {
        *self.eval_result.borrow_mut() = value;
    }

    /// Fire navigate-complete and document-complete for the top-level frame
    /// from inside every `navigate` call.
    pub fn complete_navigations(&self, on: bool) {
        self.complete_navigations.set(on);
    }

    pub fn consume_accelerators(&self, on: bool) {
        self.consume_accelerators.set(on);
    }

    /// Deliver a notification through the registered site.
    pub fn fire(&self, dispid: i32, args: &[InvokeArg]) {
        let site = self.site.borrow().clone();
        if let Some(site) = site.and_then(|s| s.upgrade()) {
            site.invoke(dispid, InvokeKind::Method, args);
        }
    }

    fn record(&self, call: Call) -> EngineResult<()> {
        let fails = self.failures.borrow().contains(&call);
        self.calls.borrow_mut().push(call);
        if fails {
            Err(EngineError::fail("injected failure"))
        } else {
            Ok(())
        }
    }
}

impl BrowserControl for FakeControl {
    fn load_class_factory(&self) -> EngineResult<()> {
        self.record(Call::ClassFactory)
    }

    fn create_instance(&self) -> EngineResult<()> {
        self.record(Call::CreateInstance)
    }

    fn set_client_site(&self, site: Option<Weak<dyn SiteHandler>>) -> EngineResult<()> {
        self.record(Call::SetClientSite(site.is_some()))?;
        *self.site.borrow_mut() = site;
        Ok(())
    }

    fn set_contained(&self, contained: bool) -> EngineResult<()> {
        self.record(Call::SetContained(contained))
    }

    fn activate_in_place(&self, container: WindowHandle, bounds: Rect) -> EngineResult<()> {
        self.record(Call::ActivateInPlace(container, bounds))
    }

    fn acquire_automation(&self) -> EngineResult<FrameId> {
        self.record(Call::AcquireAutomation)?;
        Ok(self.frame)
    }

    fn acquire_active_object(&self) -> EngineResult<()> {
        self.record(Call::AcquireActiveObject)
    }

    fn subscribe(&self) -> EngineResult<EventToken> {
        self.record(Call::Subscribe)?;
        Ok(EventToken(1))
    }

    fn unsubscribe(&self, token: EventToken) -> EngineResult<()> {
        self.record(Call::Unsubscribe(token))
    }

    fn stop(&self) -> EngineResult<()> {
        self.record(Call::Stop)
    }

    fn close_document(&self) -> EngineResult<()> {
        self.record(Call::CloseDocument)
    }

    fn set_visible(&self, visible: bool) -> EngineResult<()> {
        self.record(Call::SetVisible(visible))
    }

    fn deactivate(&self, container: WindowHandle) -> EngineResult<()> {
        self.record(Call::Deactivate(container))
    }

    fn close(&self) -> EngineResult<()> {
        self.record(Call::Close)
    }

    fn disconnect(&self) -> EngineResult<()> {
        self.record(Call::Disconnect)
    }

    fn set_bounds(&self, bounds: Rect) -> EngineResult<()> {
        self.record(Call::SetBounds(bounds))
    }

    fn set_object_rects(&self, rect: Rect) -> EngineResult<()> {
        self.record(Call::SetObjectRects(rect))
    }

    fn navigate(&self, request: &NavigateRequest) -> EngineResult<()> {
        self.record(Call::Navigate(request.clone()))?;
        *self.location.borrow_mut() = request.url.clone();
        if self.complete_navigations.get() {
            let args = [
                InvokeArg::Frame(self.frame),
                InvokeArg::Text(request.url.clone()),
            ];
            self.fire(NAVIGATE_COMPLETE, &args);
            self.fire(DOCUMENT_COMPLETE, &args);
        }
        Ok(())
    }

    fn location_url(&self) -> EngineResult<String> {
        self.record(Call::LocationUrl)?;
        Ok(self.location.borrow().clone())
    }

    fn eval(&self, script: &str) -> EngineResult<ScriptValue> {
        self.record(Call::Eval(script.to_owned()))?;
        if self.eval_fails.get() {
            return Err(EngineError::new(0x8002_0009_u32 as i32, "exception occurred"));
        }
        Ok(self.eval_result.borrow().clone())
    }

    fn translate_accelerator(&self, msg: &InputMessage) -> bool {
        let _ = self.record(Call::TranslateAccelerator(*msg));
        self.consume_accelerators.get()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Focus(WindowHandle),
    CaptionDrag(WindowHandle),
}

#[derive(Default)]
pub struct FakeHost {
    rects: RefCell<HashMap<WindowHandle, Rect>>,
    roots: RefCell<HashMap<WindowHandle, WindowHandle>>,
    children: RefCell<Vec<(WindowHandle, WindowHandle)>>,
    focus_refused: Cell<bool>,
    calls: RefCell<Vec<HostCall>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rect(&self, window: WindowHandle, rect: Rect) {
        self.rects.borrow_mut().insert(window, rect);
    }

    pub fn set_root(&self, window: WindowHandle, root: WindowHandle) {
        self.roots.borrow_mut().insert(window, root);
    }

    pub fn add_child(&self, parent: WindowHandle, child: WindowHandle) {
        self.children.borrow_mut().push((parent, child));
    }

    pub fn refuse_focus(&self) {
        self.focus_refused.set(true);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }
}

impl WindowHost for FakeHost {
    fn client_rect(&self, window: WindowHandle) -> EngineResult<Rect> {
        self.rects
            .borrow()
            .get(&window)
            .copied()
            .ok_or_else(|| EngineError::fail("invalid window handle"))
    }

    fn root_ancestor(&self, window: WindowHandle) -> Option<WindowHandle> {
        self.roots.borrow().get(&window).copied()
    }

    fn focus(&self, window: WindowHandle) -> bool {
        self.calls.borrow_mut().push(HostCall::Focus(window));
        !self.focus_refused.get()
    }

    fn begin_caption_drag(&self, window: WindowHandle) {
        self.calls.borrow_mut().push(HostCall::CaptionDrag(window));
    }

    fn is_child(&self, parent: WindowHandle, window: WindowHandle) -> bool {
        self.children.borrow().contains(&(parent, window))
    }
}
