//! Windows binding: the `WebBrowser` ActiveX control hosted over OLE.
//!
//! [`TridentControl`] drives the control, [`TridentSite`] is the COM object
//! the control calls back into, and [`Win32Host`] answers the window-manager
//! queries. All of it is apartment-threaded and must stay on the UI thread.

use std::cell::RefCell;
use std::ffi::c_void;
use std::mem::ManuallyDrop;
use std::ptr;
use std::rc::Weak;

use tracing::{debug, trace};
use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::System::Com::*;
use windows::Win32::System::Ole::*;
use windows::Win32::System::Variant::*;
use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetFocus};
use windows::Win32::UI::Shell::{DWebBrowserEvents2, DWebBrowserEvents2_Impl, IWebBrowser2};
use windows::Win32::UI::WindowsAndMessaging::*;

use super::mshtml::{HostUiInfo, IDocHostUIHandler, IDocHostUIHandler_Impl, IHTMLDocument};
use crate::callbacks::EventCallbacks;
use crate::engine::{
    BrowserControl, EngineResult, EventToken, FrameId, InputMessage, InvokeArg, InvokeKind, Rect,
    ScriptValue, SiteHandler, WindowHandle, WindowHost,
};
use crate::error::EngineError;
use crate::navigation::NavigateRequest;
use crate::options::WebViewOptions;
use crate::router;
use crate::site::{self, Capability};
use crate::webview::WebView;

/// `CLSID_WebBrowser`
const CLSID_WEB_BROWSER: GUID = GUID::from_u128(0x8856f961_340a_11d0_a96b_00c04fd705a2);

const LOCALE_SYSTEM_DEFAULT: u32 = 0x0800;

/// The Trident-backed webview.
pub type TridentWebView = WebView<TridentControl, Win32Host>;

impl WebView<TridentControl, Win32Host> {
    pub fn new(callbacks: EventCallbacks, options: WebViewOptions) -> Self {
        Self::with_backend(TridentControl::new(), Win32Host, callbacks, options)
    }
}

/// Initialise OLE on the calling thread. Must precede any webview creation.
pub fn initialize() -> EngineResult<()> {
    unsafe { OleInitialize(None)? };
    Ok(())
}

/// Drain the calling thread's message queue without blocking.
///
/// Keyboard messages are offered to the accelerator router first; a consumed
/// message is neither translated nor dispatched.
pub fn pump_pending() {
    unsafe {
        let mut msg = MSG::default();
        while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
            if router::translate(&input_message(&msg)) {
                continue;
            }
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

fn input_message(msg: &MSG) -> InputMessage {
    InputMessage {
        target: handle(msg.hwnd),
        message: msg.message,
        wparam: msg.wParam.0,
        lparam: msg.lParam.0,
        time: msg.time,
        point: (msg.pt.x, msg.pt.y),
    }
}

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.0 as *mut c_void)
}

fn handle(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as isize)
}

fn to_rect(rect: &RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right - rect.left, rect.bottom - rect.top)
}

fn from_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.x,
        top: rect.y,
        right: rect.x + rect.width,
        bottom: rect.y + rect.height,
    }
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn missing(what: &str) -> EngineError {
    EngineError::new(E_POINTER.0, format!("{what} not created"))
}

/// Identity of a COM object: the address of its canonical `IUnknown`.
fn identity(object: &IUnknown) -> Result<FrameId> {
    let unknown: IUnknown = object.cast()?;
    Ok(FrameId(unknown.as_raw() as usize))
}

/// The `WebBrowser` control and the interfaces the adapter holds on it.
#[derive(Default)]
pub struct TridentControl {
    factory: RefCell<Option<IClassFactory>>,
    object: RefCell<Option<IOleObject>>,
    browser: RefCell<Option<IWebBrowser2>>,
    active: RefCell<Option<IOleInPlaceActiveObject>>,
    site: RefCell<Option<IOleClientSite>>,
    events: RefCell<Option<IConnectionPoint>>,
}

impl TridentControl {
    pub fn new() -> Self {
        Self::default()
    }

    // Interfaces are cloned out so no borrow is held while the control runs;
    // it may call back into the site and from there into this object.
    fn object(&self) -> EngineResult<IOleObject> {
        self.object.borrow().clone().ok_or_else(|| missing("control"))
    }

    fn browser(&self) -> EngineResult<IWebBrowser2> {
        self.browser.borrow().clone().ok_or_else(|| missing("automation object"))
    }

    fn site(&self) -> EngineResult<IOleClientSite> {
        self.site.borrow().clone().ok_or_else(|| missing("client site"))
    }

    fn script(&self) -> EngineResult<IDispatch> {
        let document: IHTMLDocument = unsafe { self.browser()?.Document()? }.cast()?;
        let mut script = ptr::null_mut();
        unsafe { document.get_Script(&mut script).ok()? };
        if script.is_null() {
            return Err(missing("script engine"));
        }
        Ok(unsafe { IDispatch::from_raw(script) })
    }
}

impl BrowserControl for TridentControl {
    fn load_class_factory(&self) -> EngineResult<()> {
        let factory: IClassFactory = unsafe {
            CoGetClassObject(&CLSID_WEB_BROWSER, CLSCTX_INPROC_SERVER | CLSCTX_INPROC_HANDLER, None)?
        };
        *self.factory.borrow_mut() = Some(factory);
        Ok(())
    }

    fn create_instance(&self) -> EngineResult<()> {
        let factory = self.factory.borrow().clone().ok_or_else(|| missing("class factory"))?;
        let object: IOleObject = unsafe { factory.CreateInstance(None::<&IUnknown>)? };
        *self.object.borrow_mut() = Some(object);
        Ok(())
    }

    fn set_client_site(&self, handler: Option<Weak<dyn SiteHandler>>) -> EngineResult<()> {
        let object = self.object()?;
        match handler {
            Some(handler) => {
                debug!(
                    roles = ?Capability::ALL.map(Capability::interface_name),
                    "creating hosting site"
                );
                let site: IOleClientSite = TridentSite { handler }.into();
                unsafe { object.SetClientSite(&site)? };
                *self.site.borrow_mut() = Some(site);
            }
            None => {
                unsafe { object.SetClientSite(None::<&IOleClientSite>)? };
                self.site.borrow_mut().take();
            }
        }
        Ok(())
    }

    fn set_contained(&self, contained: bool) -> EngineResult<()> {
        unsafe { OleSetContainedObject(&self.object()?, BOOL::from(contained))? };
        Ok(())
    }

    fn activate_in_place(&self, container: WindowHandle, bounds: Rect) -> EngineResult<()> {
        let rect = from_rect(bounds);
        unsafe {
            self.object()?.DoVerb(
                OLEIVERB_INPLACEACTIVATE.0,
                ptr::null(),
                &self.site()?,
                -1,
                hwnd(container),
                &rect,
            )?
        };
        Ok(())
    }

    fn acquire_automation(&self) -> EngineResult<FrameId> {
        let browser: IWebBrowser2 = self.object()?.cast()?;
        let frame = identity(&browser.cast()?)?;
        *self.browser.borrow_mut() = Some(browser);
        Ok(frame)
    }

    fn acquire_active_object(&self) -> EngineResult<()> {
        let active: IOleInPlaceActiveObject = self.browser()?.cast()?;
        *self.active.borrow_mut() = Some(active);
        Ok(())
    }

    fn subscribe(&self) -> EngineResult<EventToken> {
        let container: IConnectionPointContainer = self.browser()?.cast()?;
        let sink: IUnknown = self.site()?.cast()?;
        let (point, cookie) = unsafe {
            let point = container.FindConnectionPoint(&DWebBrowserEvents2::IID)?;
            let cookie = point.Advise(&sink)?;
            (point, cookie)
        };
        *self.events.borrow_mut() = Some(point);
        Ok(EventToken(cookie))
    }

    fn unsubscribe(&self, token: EventToken) -> EngineResult<()> {
        let point = self.events.borrow_mut().take();
        if let Some(point) = point {
            unsafe { point.Unadvise(token.0)? };
        }
        Ok(())
    }

    fn stop(&self) -> EngineResult<()> {
        unsafe { self.browser()?.Stop()? };
        Ok(())
    }

    fn close_document(&self) -> EngineResult<()> {
        unsafe {
            self.browser()?
                .ExecWB(OLECMDID_CLOSE, OLECMDEXECOPT_DONTPROMPTUSER, None, None)?
        };
        Ok(())
    }

    fn set_visible(&self, visible: bool) -> EngineResult<()> {
        let value = if visible { VARIANT_TRUE } else { VARIANT_FALSE };
        unsafe { self.browser()?.SetVisible(value)? };
        Ok(())
    }

    fn deactivate(&self, container: WindowHandle) -> EngineResult<()> {
        unsafe {
            self.object()?.DoVerb(
                OLEIVERB_HIDE.0,
                ptr::null(),
                &self.site()?,
                0,
                hwnd(container),
                ptr::null(),
            )?
        };
        Ok(())
    }

    fn close(&self) -> EngineResult<()> {
        unsafe { self.object()?.Close(OLECLOSE_NOSAVE)? };
        Ok(())
    }

    fn disconnect(&self) -> EngineResult<()> {
        let object = self.object.borrow_mut().take();
        self.active.borrow_mut().take();
        self.browser.borrow_mut().take();
        self.factory.borrow_mut().take();
        self.site.borrow_mut().take();
        if let Some(object) = object {
            unsafe { CoDisconnectObject(&object, 0)? };
        }
        Ok(())
    }

    fn set_bounds(&self, bounds: Rect) -> EngineResult<()> {
        let browser = self.browser()?;
        unsafe {
            browser.SetLeft(bounds.x)?;
            browser.SetTop(bounds.y)?;
            browser.SetWidth(bounds.width)?;
            browser.SetHeight(bounds.height)?;
        }
        Ok(())
    }

    fn set_object_rects(&self, rect: Rect) -> EngineResult<()> {
        let object: IOleInPlaceObject = self.browser()?.cast()?;
        let rect = from_rect(rect);
        unsafe { object.SetObjectRects(&rect, &rect)? };
        Ok(())
    }

    fn navigate(&self, request: &NavigateRequest) -> EngineResult<()> {
        let url = BSTR::from(request.url.as_str());
        let flags = VARIANT::from(request.flags);
        let target = VARIANT::default();
        let headers = match &request.headers {
            Some(block) => VARIANT::from(BSTR::from(block.as_str())),
            None => VARIANT::default(),
        };
        let post_data = match &request.post_data {
            Some(body) => unsafe { InitVariantFromBuffer(body.as_ptr().cast(), body.len() as u32)? },
            None => VARIANT::default(),
        };
        unsafe {
            self.browser()?.Navigate(
                &url,
                Some(ptr::from_ref(&flags)),
                Some(ptr::from_ref(&target)),
                Some(ptr::from_ref(&post_data)),
                Some(ptr::from_ref(&headers)),
            )?
        };
        Ok(())
    }

    fn location_url(&self) -> EngineResult<String> {
        let url = unsafe { self.browser()?.LocationURL()? };
        Ok(url.to_string())
    }

    fn eval(&self, script: &str) -> EngineResult<ScriptValue> {
        let dispatch = self.script()?;
        let name = wide("eval");
        let mut dispid = 0;
        unsafe {
            dispatch.GetIDsOfNames(
                &GUID::zeroed(),
                &PCWSTR(name.as_ptr()),
                1,
                LOCALE_SYSTEM_DEFAULT,
                &mut dispid,
            )?
        };

        let mut args = [VARIANT::from(BSTR::from(script))];
        let params = DISPPARAMS {
            rgvarg: args.as_mut_ptr(),
            cArgs: 1,
            ..Default::default()
        };
        let mut result = VARIANT::default();
        let mut exception = EXCEPINFO::default();
        let outcome = unsafe {
            dispatch.Invoke(
                dispid,
                &GUID::zeroed(),
                LOCALE_SYSTEM_DEFAULT,
                DISPATCH_METHOD,
                &params,
                Some(ptr::from_mut(&mut result)),
                Some(ptr::from_mut(&mut exception)),
                None,
            )
        };
        let description = exception_description(&mut exception);
        outcome.map_err(|e| script_error(e, description))?;
        Ok(script_value(&result))
    }

    fn translate_accelerator(&self, msg: &InputMessage) -> bool {
        let active = self.active.borrow().clone();
        let Some(active) = active else {
            return false;
        };
        let msg = MSG {
            hwnd: hwnd(msg.target),
            message: msg.message,
            wParam: WPARAM(msg.wparam),
            lParam: LPARAM(msg.lparam),
            time: msg.time,
            pt: POINT {
                x: msg.point.0,
                y: msg.point.1,
            },
        };
        // The projected method folds S_FALSE ("not mine") into Ok.
        let hr = unsafe { (Interface::vtable(&active).TranslateAccelerator)(active.as_raw(), &msg) };
        accelerator_consumed(hr)
    }
}

fn accelerator_consumed(hr: HRESULT) -> bool {
    hr == S_OK
}

/// Take the description out of an `EXCEPINFO`, releasing its strings.
fn exception_description(exception: &mut EXCEPINFO) -> String {
    let (source, description, help) = unsafe {
        (
            ManuallyDrop::take(&mut exception.bstrSource),
            ManuallyDrop::take(&mut exception.bstrDescription),
            ManuallyDrop::take(&mut exception.bstrHelpFile),
        )
    };
    drop((source, help));
    description.to_string()
}

fn script_error(e: Error, description: String) -> EngineError {
    if description.is_empty() {
        e.into()
    } else {
        EngineError::new(e.code().0, description)
    }
}

fn variant_type(value: &VARIANT) -> VARENUM {
    VARENUM(unsafe { value.as_raw().Anonymous.Anonymous.vt })
}

fn script_value(value: &VARIANT) -> ScriptValue {
    let vt = variant_type(value);
    if vt == VT_EMPTY {
        ScriptValue::Undefined
    } else if vt == VT_NULL {
        ScriptValue::Null
    } else if vt == VT_BOOL {
        bool::try_from(value).map_or(ScriptValue::Null, ScriptValue::Bool)
    } else if vt == VT_BSTR {
        BSTR::try_from(value).map_or(ScriptValue::Null, |s| ScriptValue::String(s.to_string()))
    } else {
        f64::try_from(value).map_or(ScriptValue::Null, ScriptValue::Number)
    }
}

/// Arguments of an `Invoke` call, in declaration order.
///
/// `DISPPARAMS` stores positional arguments last-to-first.
unsafe fn invoke_args(params: *const DISPPARAMS) -> Vec<InvokeArg> {
    let Some(params) = params.as_ref() else {
        return Vec::new();
    };
    if params.rgvarg.is_null() {
        return Vec::new();
    }
    let raw = std::slice::from_raw_parts(params.rgvarg, params.cArgs as usize);
    raw.iter().rev().map(invoke_arg).collect()
}

fn invoke_arg(value: &VARIANT) -> InvokeArg {
    let vt = variant_type(value);
    if vt == VT_DISPATCH || vt == VT_UNKNOWN {
        // `pdispVal` and `punkVal` share a slot.
        let raw = unsafe { value.as_raw().Anonymous.Anonymous.Anonymous.punkVal };
        unsafe { IUnknown::from_raw_borrowed(&raw) }
            .and_then(|object| identity(object).ok())
            .map_or(InvokeArg::Other, InvokeArg::Frame)
    } else if vt == VT_BSTR {
        BSTR::try_from(value).map_or(InvokeArg::Other, |s| InvokeArg::Text(s.to_string()))
    } else {
        InvokeArg::Other
    }
}

/// The hosting site: one COM object answering every role in
/// [`Capability::ALL`], forwarding to the adapter through a weak reference.
#[implement(IOleClientSite, IOleInPlaceSite, IDocHostUIHandler, DWebBrowserEvents2)]
pub struct TridentSite {
    handler: Weak<dyn SiteHandler>,
}

impl TridentSite {
    fn container(&self) -> HWND {
        self.handler
            .upgrade()
            .map_or(HWND::default(), |h| hwnd(h.container()))
    }
}

impl IOleWindow_Impl for TridentSite_Impl {
    fn GetWindow(&self) -> Result<HWND> {
        Ok(self.container())
    }

    fn ContextSensitiveHelp(&self, _fentermode: BOOL) -> Result<()> {
        Ok(())
    }
}

impl IOleClientSite_Impl for TridentSite_Impl {
    fn SaveObject(&self) -> Result<()> {
        Ok(())
    }

    fn GetMoniker(&self, _dwassign: &OLEGETMONIKER, _dwwhichmoniker: &OLEWHICHMK) -> Result<IMoniker> {
        Err(E_NOTIMPL.into())
    }

    fn GetContainer(&self) -> Result<IOleContainer> {
        Err(E_NOINTERFACE.into())
    }

    fn ShowObject(&self) -> Result<()> {
        Ok(())
    }

    fn OnShowWindow(&self, _fshow: BOOL) -> Result<()> {
        Ok(())
    }

    fn RequestNewObjectLayout(&self) -> Result<()> {
        Err(E_NOTIMPL.into())
    }
}

impl IOleInPlaceSite_Impl for TridentSite_Impl {
    fn CanInPlaceActivate(&self) -> Result<()> {
        Ok(())
    }

    fn OnInPlaceActivate(&self) -> Result<()> {
        Ok(())
    }

    fn OnUIActivate(&self) -> Result<()> {
        Ok(())
    }

    fn GetWindowContext(
        &self,
        ppframe: *mut Option<IOleInPlaceFrame>,
        ppdoc: *mut Option<IOleInPlaceUIWindow>,
        lprcposrect: *mut RECT,
        lprccliprect: *mut RECT,
        lpframeinfo: *mut OLEINPLACEFRAMEINFO,
    ) -> Result<()> {
        let container = self.container();
        let mut client = RECT::default();
        unsafe {
            let _ = GetClientRect(container, &mut client);
            if let Some(frame) = ppframe.as_mut() {
                *frame = None;
            }
            if let Some(doc) = ppdoc.as_mut() {
                *doc = None;
            }
            if let Some(pos) = lprcposrect.as_mut() {
                *pos = client;
            }
            if let Some(clip) = lprccliprect.as_mut() {
                *clip = client;
            }
            if let Some(info) = lpframeinfo.as_mut() {
                info.fMDIApp = FALSE;
                info.hwndFrame = container;
                info.haccel = HACCEL::default();
                info.cAccelEntries = 0;
            }
        }
        Ok(())
    }

    fn Scroll(&self, _scrollextant: &SIZE) -> Result<()> {
        Err(E_NOTIMPL.into())
    }

    fn OnUIDeactivate(&self, _fundoable: BOOL) -> Result<()> {
        Ok(())
    }

    fn OnInPlaceDeactivate(&self) -> Result<()> {
        Ok(())
    }

    fn DiscardUndoState(&self) -> Result<()> {
        Err(E_NOTIMPL.into())
    }

    fn DeactivateAndUndo(&self) -> Result<()> {
        Err(E_NOTIMPL.into())
    }

    fn OnPosRectChange(&self, lprcposrect: *const RECT) -> Result<()> {
        let Some(rect) = (unsafe { lprcposrect.as_ref() }) else {
            return Err(E_POINTER.into());
        };
        if let Some(handler) = self.handler.upgrade() {
            handler.position_changed(to_rect(rect));
        }
        Ok(())
    }
}

/// Clear an out pointer the caller may read even on failure.
unsafe fn clear<T>(out: *mut *mut T) {
    if let Some(out) = out.as_mut() {
        *out = ptr::null_mut();
    }
}

impl IDocHostUIHandler_Impl for TridentSite_Impl {
    unsafe fn ShowContextMenu(
        &self,
        id: u32,
        _point: *const POINT,
        _command_target: *mut c_void,
        _object: *mut c_void,
    ) -> HRESULT {
        if site::allows_native_context_menu(id) {
            S_FALSE
        } else {
            S_OK
        }
    }

    unsafe fn GetHostInfo(&self, info: *mut HostUiInfo) -> HRESULT {
        match info.as_mut() {
            Some(info) => {
                info.flags |= site::HOST_UI_FLAGS;
                S_OK
            }
            None => E_POINTER,
        }
    }

    unsafe fn ShowUI(
        &self,
        _id: u32,
        _active_object: *mut c_void,
        _command_target: *mut c_void,
        _frame: *mut c_void,
        _document: *mut c_void,
    ) -> HRESULT {
        S_OK
    }

    unsafe fn HideUI(&self) -> HRESULT {
        S_OK
    }

    unsafe fn UpdateUI(&self) -> HRESULT {
        S_OK
    }

    unsafe fn EnableModeless(&self, _enable: BOOL) -> HRESULT {
        S_OK
    }

    unsafe fn OnDocWindowActivate(&self, _activate: BOOL) -> HRESULT {
        S_OK
    }

    unsafe fn OnFrameWindowActivate(&self, _activate: BOOL) -> HRESULT {
        S_OK
    }

    unsafe fn ResizeBorder(&self, _border: *const RECT, _window: *mut c_void, _frame_window: BOOL) -> HRESULT {
        S_OK
    }

    unsafe fn TranslateAccelerator(&self, _msg: *const MSG, _group: *const GUID, _command: u32) -> HRESULT {
        S_FALSE
    }

    unsafe fn GetOptionKeyPath(&self, key: *mut PWSTR, _reserved: u32) -> HRESULT {
        if let Some(key) = key.as_mut() {
            *key = PWSTR::null();
        }
        S_FALSE
    }

    unsafe fn GetDropTarget(&self, _target: *mut c_void, result: *mut *mut c_void) -> HRESULT {
        clear(result);
        E_NOTIMPL
    }

    unsafe fn GetExternal(&self, dispatch: *mut *mut c_void) -> HRESULT {
        let Some(out) = dispatch.as_mut() else {
            return E_POINTER;
        };
        match self.cast::<IDispatch>() {
            Ok(external) => {
                *out = external.into_raw();
                S_OK
            }
            Err(e) => {
                *out = ptr::null_mut();
                e.code()
            }
        }
    }

    unsafe fn TranslateUrl(&self, _translate: u32, _url: *const u16, translated: *mut *mut u16) -> HRESULT {
        clear(translated);
        S_FALSE
    }

    unsafe fn FilterDataObject(&self, _object: *mut c_void, result: *mut *mut c_void) -> HRESULT {
        clear(result);
        S_FALSE
    }
}

// Event sink and `external` object share one dispatch table: engine
// notifications arrive by their fixed ids, bridge members by the ids
// `GetIDsOfNames` handed out.
impl IDispatch_Impl for TridentSite_Impl {
    fn GetTypeInfoCount(&self) -> Result<u32> {
        Ok(0)
    }

    fn GetTypeInfo(&self, _itinfo: u32, _lcid: u32) -> Result<ITypeInfo> {
        Err(E_NOTIMPL.into())
    }

    fn GetIDsOfNames(
        &self,
        _riid: *const GUID,
        rgsznames: *const PCWSTR,
        cnames: u32,
        _lcid: u32,
        rgdispid: *mut i32,
    ) -> Result<()> {
        if rgsznames.is_null() || rgdispid.is_null() {
            return Err(E_POINTER.into());
        }
        let handler = self.handler.upgrade();
        let names = unsafe { std::slice::from_raw_parts(rgsznames, cnames as usize) };
        let ids = unsafe { std::slice::from_raw_parts_mut(rgdispid, cnames as usize) };
        let mut found = true;
        for (name, id) in names.iter().zip(ids.iter_mut()) {
            let name = unsafe { name.to_string() }.unwrap_or_default();
            match handler.as_ref().and_then(|h| h.member_id(&name)) {
                Some(dispid) => *id = dispid,
                None => {
                    *id = DISPID_UNKNOWN;
                    found = false;
                }
            }
        }
        if found {
            Ok(())
        } else {
            Err(DISP_E_UNKNOWNNAME.into())
        }
    }

    fn Invoke(
        &self,
        dispidmember: i32,
        _riid: *const GUID,
        _lcid: u32,
        wflags: DISPATCH_FLAGS,
        pdispparams: *const DISPPARAMS,
        _pvarresult: *mut VARIANT,
        _pexcepinfo: *mut EXCEPINFO,
        _puargerr: *mut u32,
    ) -> Result<()> {
        let Some(handler) = self.handler.upgrade() else {
            trace!(dispid = dispidmember, "site invoked after its adapter was dropped");
            return Ok(());
        };
        let args = unsafe { invoke_args(pdispparams) };
        handler.invoke(dispidmember, InvokeKind::from_flags(wflags.0), &args);
        Ok(())
    }
}

impl DWebBrowserEvents2_Impl for TridentSite_Impl {}

/// Win32 window-manager calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Host;

impl WindowHost for Win32Host {
    fn client_rect(&self, window: WindowHandle) -> EngineResult<Rect> {
        let mut rect = RECT::default();
        unsafe { GetClientRect(hwnd(window), &mut rect)? };
        Ok(to_rect(&rect))
    }

    fn root_ancestor(&self, window: WindowHandle) -> Option<WindowHandle> {
        let root = unsafe { GetAncestor(hwnd(window), GA_ROOT) };
        (!root.is_invalid()).then(|| handle(root))
    }

    fn focus(&self, window: WindowHandle) -> bool {
        unsafe { SetFocus(hwnd(window)) }.is_ok()
    }

    fn begin_caption_drag(&self, window: WindowHandle) {
        unsafe {
            let _ = ReleaseCapture();
            SendMessageW(hwnd(window), WM_NCLBUTTONDOWN, WPARAM(HTCAPTION as usize), LPARAM(0));
        }
    }

    fn is_child(&self, parent: WindowHandle, window: WindowHandle) -> bool {
        unsafe { IsChild(hwnd(parent), hwnd(window)) }.as_bool()
    }
}
