use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::adapter::{Adapter, AdapterState};
use crate::callbacks::{EvaluationCallback, EventCallbacks};
use crate::engine::{BrowserControl, Rect, WindowHandle, WindowHost};
use crate::error::Result;
use crate::navigation::{HttpHeader, NavigateRequest};
use crate::options::WebViewOptions;

/// An embedded browser area.
///
/// Dropping the webview tears the engine control down; no callback fires
/// after that.
pub struct WebView<C, H>
where
    C: BrowserControl + 'static,
    H: WindowHost + 'static,
{
    adapter: Rc<Adapter<C, H>>,
    dev_tools: Cell<bool>,
}

impl<C, H> WebView<C, H>
where
    C: BrowserControl + 'static,
    H: WindowHost + 'static,
{
    pub fn with_backend(control: C, host: H, callbacks: EventCallbacks, options: WebViewOptions) -> Self {
        let dev_tools = Cell::new(options.devtools);
        Self {
            adapter: Adapter::new(control, host, callbacks, options),
            dev_tools,
        }
    }

    pub fn state(&self) -> AdapterState {
        self.adapter.state()
    }

    pub fn adapter(&self) -> &Rc<Adapter<C, H>> {
        &self.adapter
    }

    /// Create the engine control inside `container`. An error here is fatal
    /// for this webview.
    pub fn attach_to_container(&self, container: WindowHandle) -> Result<()> {
        self.adapter.attach(container)
    }

    pub fn set_rect(&self, x: i32, y: i32, width: i32, height: i32) {
        self.adapter.set_rect(Rect::new(x, y, width, height));
    }

    pub fn load_local_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_string_lossy();
        self.navigate(NavigateRequest::to(path.as_ref()));
    }

    pub fn load_request(&self, method: &str, url: &str, headers: &[HttpHeader], body: Option<&[u8]>) {
        self.navigate(NavigateRequest::from_http(method, url, headers, body));
    }

    /// Evaluate `script` in the current page. `callback` receives the JSON
    /// text of the result or the error.
    pub fn evaluate_javascript(&self, script: &str, callback: Option<EvaluationCallback>) {
        let result = self
            .adapter
            .execute_script(script)
            .map(|value| value.to_json())
            .map_err(|e| e.to_string());
        match (callback, result) {
            (Some(callback), result) => callback(result),
            (None, Err(e)) => warn!(error = %e, "script evaluation failed"),
            (None, Ok(_)) => {}
        }
    }

    /// Navigate again to the current location.
    ///
    /// A plain refresh does not fire the completion events the preload
    /// injection and `did_stop_loading` depend on.
    pub fn reload(&self) {
        match self.adapter.location_url() {
            Ok(url) => self.navigate(NavigateRequest::to(url)),
            Err(e) => warn!(error = %e, "reload failed: no current location"),
        }
    }

    /// Record the requested devtools state. The engine has no devtools, so
    /// nothing else changes.
    pub fn set_dev_tools_enabled(&self, enabled: bool) {
        debug!(enabled, "devtools are not available in this engine");
        self.dev_tools.set(enabled);
    }

    pub fn dev_tools_enabled(&self) -> bool {
        self.dev_tools.get()
    }

    fn navigate(&self, request: NavigateRequest) {
        if let Err(e) = self.adapter.navigate(&request) {
            warn!(url = %request.url, error = %e, "navigation failed");
        }
    }
}

impl<C, H> Drop for WebView<C, H>
where
    C: BrowserControl + 'static,
    H: WindowHost + 'static,
{
    fn drop(&mut self) {
        self.adapter.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::engine::{FrameId, InputMessage, ScriptValue};
    use crate::navigation::NAV_UNCACHED;
    use crate::router;
    use crate::testing::{Call, FakeControl, FakeHost};

    type TestView = WebView<FakeControl, FakeHost>;

    fn webview(frame: usize, container: isize, stops: Rc<RefCell<usize>>, dir: &Path) -> TestView {
        let callbacks = EventCallbacks {
            did_stop_loading: Box::new(move |err| {
                assert!(err.is_none());
                *stops.borrow_mut() += 1;
            }),
            ..EventCallbacks::noop()
        };
        let control = FakeControl::new(FrameId(frame));
        control.complete_navigations(true);
        let host = FakeHost::new();
        host.set_rect(WindowHandle(container), Rect::new(0, 0, 800, 600));
        host.add_child(WindowHandle(container), WindowHandle(container * 10));
        WebView::with_backend(
            control,
            host,
            callbacks,
            WebViewOptions::default().with_preload_dir(dir),
        )
    }

    fn preload_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        crate::preload::write_scripts(dir.path());
        dir
    }

    fn key_for(target: isize) -> InputMessage {
        InputMessage {
            target: WindowHandle(target),
            message: 0x0100,
            wparam: 0x56,
            lparam: 0,
            time: 0,
            point: (0, 0),
        }
    }

    #[test]
    fn local_load_stops_once_after_preload() {
        let dir = preload_dir();
        let stops = Rc::new(RefCell::new(0));
        let view = webview(1, 7, stops.clone(), dir.path());
        view.attach_to_container(WindowHandle(7)).unwrap();
        view.adapter().control.clear_calls();

        view.load_local_file(r"C:\app\index.html");

        assert_eq!(*stops.borrow(), 1);
        let calls = view.adapter().control.calls();
        let nav = calls
            .iter()
            .position(|c| matches!(c, Call::Navigate(r) if r.url == r"C:\app\index.html" && r.flags == NAV_UNCACHED))
            .unwrap();
        let eval = calls
            .iter()
            .position(|c| matches!(c, Call::Eval(s) if s.starts_with("(function(){")))
            .unwrap();
        assert!(nav < eval);
    }

    #[test]
    fn instances_do_not_see_each_other() {
        let dir = preload_dir();
        let (stops_a, stops_b) = (Rc::new(RefCell::new(0)), Rc::new(RefCell::new(0)));
        let a = webview(1, 7, stops_a.clone(), dir.path());
        let b = webview(2, 8, stops_b.clone(), dir.path());
        a.attach_to_container(WindowHandle(7)).unwrap();
        b.attach_to_container(WindowHandle(8)).unwrap();
        a.adapter().control.consume_accelerators(true);
        b.adapter().control.consume_accelerators(true);

        a.load_local_file("a.html");
        assert_eq!((*stops_a.borrow(), *stops_b.borrow()), (1, 0));

        assert!(router::translate(&key_for(70)));
        let offered_to_b = b
            .adapter()
            .control
            .calls()
            .iter()
            .any(|c| matches!(c, Call::TranslateAccelerator(_)));
        assert!(!offered_to_b);

        // Both pages share one bundle.
        b.load_local_file("b.html");
        let bundle_a = a.adapter().control.evaluated();
        let bundle_b = b.adapter().control.evaluated();
        assert_eq!(bundle_a, bundle_b);
        assert_eq!(router::live_adapters(), 2);
    }

    #[test]
    fn dropping_the_view_unregisters_it() {
        let dir = preload_dir();
        let view = webview(1, 7, Rc::default(), dir.path());
        view.attach_to_container(WindowHandle(7)).unwrap();
        let id = view.adapter().id();
        let adapter = view.adapter().clone();
        assert!(router::is_registered(id));

        drop(view);

        assert!(!router::is_registered(id));
        assert_eq!(adapter.state(), AdapterState::Destroyed);
        assert!(!router::translate(&key_for(70)));
    }

    #[test]
    fn load_request_passes_headers_and_body() {
        let dir = preload_dir();
        let view = webview(1, 7, Rc::default(), dir.path());
        view.attach_to_container(WindowHandle(7)).unwrap();

        view.load_request(
            "POST",
            "https://example.com/login",
            &[HttpHeader::new("Content-Type", "application/x-www-form-urlencoded")],
            Some(b"user=a"),
        );

        let navigated = view.adapter().control.calls().into_iter().find_map(|c| match c {
            Call::Navigate(r) => Some(r),
            _ => None,
        });
        let request = navigated.unwrap();
        assert_eq!(
            request.headers.as_deref(),
            Some("Content-Type: application/x-www-form-urlencoded\r\n")
        );
        assert_eq!(request.post_data.as_deref(), Some(&b"user=a"[..]));
    }

    #[test]
    fn reload_renavigates_current_location() {
        let dir = preload_dir();
        let view = webview(1, 7, Rc::default(), dir.path());
        view.attach_to_container(WindowHandle(7)).unwrap();
        view.load_local_file("page.html");
        view.adapter().control.clear_calls();

        view.reload();

        let calls = view.adapter().control.calls();
        assert!(calls.contains(&Call::LocationUrl));
        assert!(calls.contains(&Call::Navigate(NavigateRequest::to("page.html"))));
    }

    #[test]
    fn evaluation_result_reaches_callback() {
        let dir = preload_dir();
        let view = webview(1, 7, Rc::default(), dir.path());
        view.attach_to_container(WindowHandle(7)).unwrap();
        view.adapter().control.set_eval_result(ScriptValue::Number(42.0));

        let got = Rc::new(RefCell::new(None));
        let sink = got.clone();
        view.evaluate_javascript("6 * 7", Some(Box::new(move |r| *sink.borrow_mut() = Some(r))));
        assert_eq!(got.borrow_mut().take(), Some(Ok("42".to_string())));

        view.adapter().control.fail_eval(true);
        let sink = got.clone();
        view.evaluate_javascript("boom(", Some(Box::new(move |r| *sink.borrow_mut() = Some(r))));
        assert!(matches!(got.borrow_mut().take(), Some(Err(_))));
    }

    #[test]
    fn calls_before_attach_are_ignored() {
        let dir = preload_dir();
        let view = webview(1, 7, Rc::default(), dir.path());

        view.set_rect(0, 0, 10, 10);
        view.load_local_file("a.html");
        view.reload();
        view.set_dev_tools_enabled(true);

        let got = Rc::new(RefCell::new(None));
        let sink = got.clone();
        view.evaluate_javascript("1", Some(Box::new(move |r| *sink.borrow_mut() = Some(r))));
        assert!(matches!(got.borrow_mut().take(), Some(Err(_))));
        assert!(view.adapter().control.calls().is_empty());
    }

    #[test]
    fn dev_tools_state_follows_options_and_setter() {
        let dir = preload_dir();
        let options = WebViewOptions {
            devtools: true,
            ..WebViewOptions::default().with_preload_dir(dir.path())
        };
        let view = WebView::with_backend(
            FakeControl::new(FrameId(1)),
            FakeHost::new(),
            EventCallbacks::noop(),
            options,
        );
        assert!(view.dev_tools_enabled());

        view.set_dev_tools_enabled(false);

        assert!(!view.dev_tools_enabled());
        assert!(view.adapter().control.calls().is_empty());
    }
}
