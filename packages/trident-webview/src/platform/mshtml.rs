//! MSHTML interfaces the `windows` crate does not project.
#![allow(non_snake_case)]

use std::ffi::c_void;

use windows::core::{interface, IUnknown, IUnknown_Vtbl, GUID, HRESULT, PWSTR};
use windows::Win32::Foundation::{BOOL, POINT, RECT};
use windows::Win32::System::Com::{IDispatch, IDispatch_Impl, IDispatch_Vtbl};
use windows::Win32::UI::WindowsAndMessaging::MSG;

/// `DOCHOSTUIINFO`
#[repr(C)]
#[derive(Debug)]
pub struct HostUiInfo {
    pub size: u32,
    pub flags: u32,
    pub double_click: u32,
    pub host_css: *mut u16,
    pub host_ns: *mut u16,
}

/// `IDocHostUIHandler`: the engine asks the host about context menus, UI
/// flags and the `window.external` object.
///
/// Interface arguments are raw pointers; the site never keeps them.
#[interface("bd3f23c0-d43e-11cf-893b-00aa00bdce1a")]
pub unsafe trait IDocHostUIHandler: IUnknown {
    pub fn ShowContextMenu(
        &self,
        id: u32,
        point: *const POINT,
        command_target: *mut c_void,
        object: *mut c_void,
    ) -> HRESULT;
    pub fn GetHostInfo(&self, info: *mut HostUiInfo) -> HRESULT;
    pub fn ShowUI(
        &self,
        id: u32,
        active_object: *mut c_void,
        command_target: *mut c_void,
        frame: *mut c_void,
        document: *mut c_void,
    ) -> HRESULT;
    pub fn HideUI(&self) -> HRESULT;
    pub fn UpdateUI(&self) -> HRESULT;
    pub fn EnableModeless(&self, enable: BOOL) -> HRESULT;
    pub fn OnDocWindowActivate(&self, activate: BOOL) -> HRESULT;
    pub fn OnFrameWindowActivate(&self, activate: BOOL) -> HRESULT;
    pub fn ResizeBorder(&self, border: *const RECT, window: *mut c_void, frame_window: BOOL) -> HRESULT;
    pub fn TranslateAccelerator(&self, msg: *const MSG, group: *const GUID, command: u32) -> HRESULT;
    pub fn GetOptionKeyPath(&self, key: *mut PWSTR, reserved: u32) -> HRESULT;
    pub fn GetDropTarget(&self, target: *mut c_void, result: *mut *mut c_void) -> HRESULT;
    pub fn GetExternal(&self, dispatch: *mut *mut c_void) -> HRESULT;
    pub fn TranslateUrl(&self, translate: u32, url: *const u16, translated: *mut *mut u16) -> HRESULT;
    pub fn FilterDataObject(&self, object: *mut c_void, result: *mut *mut c_void) -> HRESULT;
}

/// `IHTMLDocument`, the base of every MSHTML document interface. Its one
/// member returns the page's script engine.
#[interface("626fc520-a41e-11cf-a731-00a0c9082637")]
pub unsafe trait IHTMLDocument: IDispatch {
    pub fn get_Script(&self, script: *mut *mut c_void) -> HRESULT;
}
