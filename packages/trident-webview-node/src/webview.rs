use napi::bindgen_prelude::*;
use napi::threadsafe_function::{ThreadSafeCallContext, ThreadsafeFunctionCallMode};
use napi::{JsFunction, JsUnknown};
use napi_derive::napi;
use tracing::debug;

use trident_webview::{EventCallbacks, WindowHandle};

use crate::events::{EvaluationCallback, StopLoadingCallback, StringMessageCallback, TitleUpdatedCallback};
use crate::manager::{handler, with_manager, MANAGER};
use crate::options::{HttpHeader, WebViewOptions};

/// An embedded Trident browser area inside a host-owned window.
#[napi(js_name = "TridentWebView")]
pub struct JsTridentWebView {
    id: u32,
    view: Option<trident_webview::TridentWebView>,
}

#[napi]
impl JsTridentWebView {
    /// Create a detached webview. Call `attach(hwnd)` to show it.
    #[napi(constructor)]
    pub fn new(options: Option<WebViewOptions>) -> Result<Self> {
        let id = with_manager(|mgr| {
            if !mgr.initialized {
                return Err(napi::Error::from_reason(
                    "Trident webview not initialized. Call init() first.",
                ));
            }
            mgr.allocate_id()
        })?;
        let options = options.unwrap_or_default().into();
        let view = trident_webview::TridentWebView::new(event_callbacks(id), options);
        debug!(id, "webview created");
        Ok(Self { id, view: Some(view) })
    }

    #[napi(getter)]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Create the control inside the window `hwnd`. Failure is final: the
    /// webview must be destroyed and recreated.
    #[napi]
    pub fn attach(&self, hwnd: i64) -> Result<()> {
        self.view()?
            .attach_to_container(WindowHandle(hwnd as isize))
            .map_err(|e| napi::Error::from_reason(e.to_string()))
    }

    /// Position the browser area in client coordinates of the container.
    #[napi]
    pub fn set_rect(&self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        self.view()?.set_rect(x, y, width, height);
        Ok(())
    }

    #[napi]
    pub fn load_local_file(&self, path: String) -> Result<()> {
        self.view()?.load_local_file(path);
        Ok(())
    }

    /// Navigate with an explicit method, headers and body.
    #[napi]
    pub fn load_request(
        &self,
        method: String,
        url: String,
        headers: Option<Vec<HttpHeader>>,
        body: Option<Buffer>,
    ) -> Result<()> {
        let headers: Vec<trident_webview::HttpHeader> =
            headers.unwrap_or_default().into_iter().map(Into::into).collect();
        self.view()?
            .load_request(&method, &url, &headers, body.as_deref());
        Ok(())
    }

    /// Evaluate `script` in the page. The optional callback receives
    /// `(error, resultJson)`.
    #[napi(ts_args_type = "script: string, callback?: (error: string | null, result: string | null) => void")]
    pub fn evaluate_javascript(&self, script: String, callback: Option<JsFunction>) -> Result<()> {
        let view = self.view()?;
        let Some(callback) = callback else {
            view.evaluate_javascript(&script, None);
            return Ok(());
        };
        let tsfn: EvaluationCallback = callback.create_threadsafe_function(
            0,
            |ctx: ThreadSafeCallContext<std::result::Result<String, String>>| {
                let null = || ctx.env.get_null().map(|v| v.into_unknown());
                let args: Vec<JsUnknown> = match &ctx.value {
                    Ok(json) => vec![null()?, ctx.env.create_string(json)?.into_unknown()],
                    Err(e) => vec![ctx.env.create_string(e)?.into_unknown(), null()?],
                };
                Ok(args)
            },
        )?;
        view.evaluate_javascript(
            &script,
            Some(Box::new(move |result| {
                tsfn.call(result, ThreadsafeFunctionCallMode::NonBlocking);
            })),
        );
        Ok(())
    }

    #[napi]
    pub fn reload(&self) -> Result<()> {
        self.view()?.reload();
        Ok(())
    }

    #[napi]
    pub fn set_dev_tools_enabled(&self, enabled: bool) -> Result<()> {
        self.view()?.set_dev_tools_enabled(enabled);
        Ok(())
    }

    /// Last requested devtools state. Trident has no devtools to show.
    #[napi(getter)]
    pub fn dev_tools_enabled(&self) -> Result<bool> {
        Ok(self.view()?.dev_tools_enabled())
    }

    /// Tear the control down. No handler fires afterwards.
    #[napi]
    pub fn destroy(&mut self) {
        if let Some(view) = self.view.take() {
            drop(view);
            with_manager(|mgr| mgr.event_handlers.remove(&self.id));
            debug!(id = self.id, "webview destroyed");
        }
    }

    // ---- Event handlers ----

    #[napi(ts_args_type = "callback: (title: string) => void")]
    pub fn on_page_title_updated(&self, callback: JsFunction) -> Result<()> {
        let tsfn: TitleUpdatedCallback = callback
            .create_threadsafe_function(0, |ctx: ThreadSafeCallContext<String>| {
                ctx.env.create_string(ctx.value.as_str()).map(|v| vec![v])
            })?;

        with_manager(|mgr| {
            if let Some(handlers) = mgr.event_handlers.get_mut(&self.id) {
                handlers.on_page_title_updated = Some(tsfn);
            }
        });
        Ok(())
    }

    /// Fired once per finished top-level load, after the preload bundle ran.
    #[napi(ts_args_type = "callback: (error: { code: number, description: string } | null) => void")]
    pub fn on_did_stop_loading(&self, callback: JsFunction) -> Result<()> {
        let tsfn: StopLoadingCallback = callback.create_threadsafe_function(
            0,
            |ctx: ThreadSafeCallContext<Option<(i32, String)>>| {
                let arg = match &ctx.value {
                    Some((code, description)) => {
                        let mut error = ctx.env.create_object()?;
                        error.set_named_property("code", ctx.env.create_int32(*code)?)?;
                        error.set_named_property("description", ctx.env.create_string(description)?)?;
                        error.into_unknown()
                    }
                    None => ctx.env.get_null()?.into_unknown(),
                };
                Ok(vec![arg])
            },
        )?;

        with_manager(|mgr| {
            if let Some(handlers) = mgr.event_handlers.get_mut(&self.id) {
                handlers.on_did_stop_loading = Some(tsfn);
            }
        });
        Ok(())
    }

    /// Page script sends strings with `window.external.post(message)`.
    #[napi(ts_args_type = "callback: (message: string) => void")]
    pub fn on_string_message(&self, callback: JsFunction) -> Result<()> {
        let tsfn: StringMessageCallback = callback
            .create_threadsafe_function(0, |ctx: ThreadSafeCallContext<String>| {
                ctx.env.create_string(ctx.value.as_str()).map(|v| vec![v])
            })?;

        with_manager(|mgr| {
            if let Some(handlers) = mgr.event_handlers.get_mut(&self.id) {
                handlers.on_string_message = Some(tsfn);
            }
        });
        Ok(())
    }
}

impl JsTridentWebView {
    fn view(&self) -> Result<&trident_webview::TridentWebView> {
        self.view
            .as_ref()
            .ok_or_else(|| napi::Error::from_reason("WebView has been destroyed"))
    }
}

/// Release the control when a webview is garbage-collected without an
/// explicit `destroy()`.
impl Drop for JsTridentWebView {
    fn drop(&mut self) {
        self.view.take();
        MANAGER.with(|m| {
            if let Ok(mut mgr) = m.try_borrow_mut() {
                mgr.event_handlers.remove(&self.id);
            }
        });
    }
}

/// Core callbacks that forward to whatever JS handlers are registered for
/// `id` at the time the event fires.
fn event_callbacks(id: u32) -> EventCallbacks {
    EventCallbacks {
        on_page_title_updated: Box::new(move |title| {
            if let Some(cb) = handler(id, |h| h.on_page_title_updated.as_ref()) {
                cb.call(title, ThreadsafeFunctionCallMode::NonBlocking);
            }
        }),
        did_stop_loading: Box::new(move |error| {
            if let Some(cb) = handler(id, |h| h.on_did_stop_loading.as_ref()) {
                let error = error.map(|e| (e.code, e.description));
                cb.call(error, ThreadsafeFunctionCallMode::NonBlocking);
            }
        }),
        on_string_message: Box::new(move |message| {
            if let Some(cb) = handler(id, |h| h.on_string_message.as_ref()) {
                cb.call(message, ThreadsafeFunctionCallMode::NonBlocking);
            }
        }),
    }
}
