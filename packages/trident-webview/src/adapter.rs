//! In-place activation of the engine control.
//!
//! One [`Adapter`] per webview. It is created `Uninitialized`, activated once
//! by [`Adapter::attach`], and torn down once; it is never reattached.
//!
//! Attach is all-or-nothing: any failed step aborts with
//! [`WebViewError::Setup`] and the adapter releases what it had created.
//! Teardown is best-effort: every step runs, failures are only logged.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::{debug, error, warn};

use crate::callbacks::EventCallbacks;
use crate::engine::{
    BrowserControl, DispId, EngineResult, EventToken, FrameId, InputMessage, InvokeArg, InvokeKind,
    Rect, ScriptValue, SiteHandler, WindowHandle, WindowHost,
};
use crate::error::{Result, WebViewError};
use crate::navigation::NavigateRequest;
use crate::options::WebViewOptions;
use crate::router::{self, AcceleratorTarget, AdapterId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Uninitialized,
    Activating,
    Activated,
    TearingDown,
    Destroyed,
}

/// Steps of the attach sequence, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    ClassFactory,
    CreateInstance,
    SetClientSite,
    SetContained,
    WindowRect,
    InPlaceActivate,
    AutomationFacet,
    ActiveObjectFacet,
    Subscribe,
}

/// Steps of teardown after leaving the registry, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStep {
    Unsubscribe,
    Stop,
    CloseDocument,
    Hide,
    Deactivate,
    Close,
    Detach,
    Disconnect,
}

pub struct Adapter<C, H> {
    id: AdapterId,
    pub(crate) control: C,
    pub(crate) host: H,
    pub(crate) callbacks: EventCallbacks,
    pub(crate) options: WebViewOptions,
    state: Cell<AdapterState>,
    container: Cell<Option<WindowHandle>>,
    frame: Cell<Option<FrameId>>,
    token: Cell<Option<EventToken>>,
    instantiated: Cell<bool>,
    this: Weak<Self>,
}

impl<C, H> Adapter<C, H>
where
    C: BrowserControl + 'static,
    H: WindowHost + 'static,
{
    pub fn new(control: C, host: H, callbacks: EventCallbacks, options: WebViewOptions) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            id: router::next_id(),
            control,
            host,
            callbacks,
            options,
            state: Cell::new(AdapterState::Uninitialized),
            container: Cell::new(None),
            frame: Cell::new(None),
            token: Cell::new(None),
            instantiated: Cell::new(false),
            this: this.clone(),
        })
    }

    pub fn id(&self) -> AdapterId {
        self.id
    }

    pub fn state(&self) -> AdapterState {
        self.state.get()
    }

    pub fn container(&self) -> Option<WindowHandle> {
        self.container.get()
    }

    /// Identity of the control's own automation facet, once activated.
    pub fn frame(&self) -> Option<FrameId> {
        self.frame.get()
    }

    /// Create the control inside `container` and activate it in place.
    pub fn attach(&self, container: WindowHandle) -> Result<()> {
        let state = self.state.get();
        if state != AdapterState::Uninitialized {
            return Err(WebViewError::InvalidState { state });
        }
        self.state.set(AdapterState::Activating);
        self.container.set(Some(container));

        match self.activate(container) {
            Ok(()) => {
                let target: Weak<dyn AcceleratorTarget> = self.this.clone();
                router::register(self.id, target);
                self.state.set(AdapterState::Activated);
                debug!(adapter = ?self.id, ?container, "webview activated");
                Ok(())
            }
            Err(e) => {
                error!(adapter = ?self.id, error = %e, "webview activation failed");
                if self.state.get() == AdapterState::Activating {
                    self.release();
                    self.state.set(AdapterState::Destroyed);
                }
                Err(e)
            }
        }
    }

    fn activate(&self, container: WindowHandle) -> Result<()> {
        let site: Weak<dyn SiteHandler> = self.this.clone();

        self.setup(SetupStep::ClassFactory, self.control.load_class_factory())?;
        self.setup(SetupStep::CreateInstance, self.control.create_instance())?;
        self.instantiated.set(true);
        self.setup(SetupStep::SetClientSite, self.control.set_client_site(Some(site)))?;
        self.setup(SetupStep::SetContained, self.control.set_contained(true))?;
        let bounds = self.setup(SetupStep::WindowRect, self.host.client_rect(container))?;
        self.setup(
            SetupStep::InPlaceActivate,
            self.control.activate_in_place(container, bounds),
        )?;
        let frame = self.setup(SetupStep::AutomationFacet, self.control.acquire_automation())?;
        self.frame.set(Some(frame));
        self.setup(SetupStep::ActiveObjectFacet, self.control.acquire_active_object())?;
        let token = self.setup(SetupStep::Subscribe, self.control.subscribe())?;
        self.token.set(Some(token));
        Ok(())
    }

    /// Map a setup result, aborting as well if a handler tore the adapter
    /// down while the step was running.
    fn setup<T>(&self, step: SetupStep, result: EngineResult<T>) -> Result<T> {
        let value = result.map_err(|source| WebViewError::Setup { step, source })?;
        match self.state.get() {
            AdapterState::Activating => Ok(value),
            state => Err(WebViewError::InvalidState { state }),
        }
    }

    /// Leave the registry and release the control. Runs at most once.
    pub fn teardown(&self) {
        match self.state.get() {
            AdapterState::Activating | AdapterState::Activated => {}
            AdapterState::Uninitialized => {
                self.state.set(AdapterState::Destroyed);
                return;
            }
            AdapterState::TearingDown | AdapterState::Destroyed => return,
        }
        self.state.set(AdapterState::TearingDown);
        router::unregister(self.id);
        self.release();
        self.state.set(AdapterState::Destroyed);
        debug!(adapter = ?self.id, "webview destroyed");
    }

    fn release(&self) {
        if let Some(token) = self.token.take() {
            best_effort(TeardownStep::Unsubscribe, self.control.unsubscribe(token));
        }
        if !self.instantiated.replace(false) {
            return;
        }
        best_effort(TeardownStep::Stop, self.control.stop());
        best_effort(TeardownStep::CloseDocument, self.control.close_document());
        best_effort(TeardownStep::Hide, self.control.set_visible(false));
        if let Some(container) = self.container.get() {
            best_effort(TeardownStep::Deactivate, self.control.deactivate(container));
        }
        best_effort(TeardownStep::Close, self.control.close());
        best_effort(TeardownStep::Detach, self.control.set_contained(false));
        best_effort(TeardownStep::Detach, self.control.set_client_site(None));
        best_effort(TeardownStep::Disconnect, self.control.disconnect());
        self.frame.set(None);
    }

    fn ensure_activated(&self) -> Result<()> {
        match self.state.get() {
            AdapterState::Activated => Ok(()),
            AdapterState::Uninitialized | AdapterState::Activating => Err(WebViewError::NotAttached),
            state => Err(WebViewError::InvalidState { state }),
        }
    }

    pub fn set_rect(&self, rect: Rect) {
        if self.ensure_activated().is_err() {
            debug!(adapter = ?self.id, ?rect, "set_rect before activation ignored");
            return;
        }
        if let Err(e) = self.control.set_bounds(rect) {
            warn!(adapter = ?self.id, error = %e, "resizing webview failed");
        }
    }

    pub fn navigate(&self, request: &NavigateRequest) -> Result<()> {
        self.ensure_activated()?;
        self.control.navigate(request)?;
        Ok(())
    }

    pub fn location_url(&self) -> Result<String> {
        self.ensure_activated()?;
        Ok(self.control.location_url()?)
    }

    /// Evaluate `script` in the current page.
    pub fn execute_script(&self, script: &str) -> Result<ScriptValue> {
        match self.state.get() {
            AdapterState::Activating | AdapterState::Activated => {}
            _ => return Err(WebViewError::NotAttached),
        }
        self.control
            .eval(script)
            .map_err(|e| WebViewError::Script(e.to_string()))
    }
}

impl<C, H> Drop for Adapter<C, H> {
    fn drop(&mut self) {
        // The façade tears down explicitly; this only catches leaks of the
        // façade's own teardown path.
        if matches!(
            self.state.get(),
            AdapterState::Activating | AdapterState::Activated
        ) {
            warn!(adapter = ?self.id, "adapter dropped while active");
            router::unregister(self.id);
        }
    }
}

fn best_effort(step: TeardownStep, result: EngineResult<()>) {
    if let Err(e) = result {
        warn!(?step, error = %e, "webview teardown step failed");
    }
}

impl<C, H> SiteHandler for Adapter<C, H>
where
    C: BrowserControl + 'static,
    H: WindowHost + 'static,
{
    fn container(&self) -> WindowHandle {
        self.container.get().unwrap_or(WindowHandle(0))
    }

    fn member_id(&self, name: &str) -> Option<DispId> {
        crate::bridge::member_id(name)
    }

    fn invoke(&self, dispid: DispId, kind: InvokeKind, args: &[InvokeArg]) {
        self.dispatch(dispid, kind, args);
    }

    fn position_changed(&self, rect: Rect) {
        if let Err(e) = self.control.set_object_rects(rect) {
            warn!(adapter = ?self.id, error = %e, "applying position change failed");
        }
    }
}

impl<C, H> AcceleratorTarget for Adapter<C, H>
where
    C: BrowserControl + 'static,
    H: WindowHost + 'static,
{
    fn owns(&self, window: WindowHandle) -> bool {
        self.container
            .get()
            .is_some_and(|container| self.host.is_child(container, window))
    }

    fn translate_accelerator(&self, msg: &InputMessage) -> bool {
        self.state.get() == AdapterState::Activated && self.control.translate_accelerator(msg)
    }
}
