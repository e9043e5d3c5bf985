use napi_derive::napi;

/// Options for creating a webview.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct WebViewOptions {
    /// Directory holding the preload scripts. Default: the
    /// `TRIDENT_WEBVIEW_PRELOAD_DIR` environment variable, else
    /// `<exe dir>/dist/ui`
    pub preload_dir: Option<String>,
    /// Requested devtools state, readable as `devToolsEnabled`. Trident has
    /// no devtools, so nothing is shown.
    /// Default: false
    pub devtools: Option<bool>,
}

impl From<WebViewOptions> for trident_webview::WebViewOptions {
    fn from(options: WebViewOptions) -> Self {
        let mut resolved = trident_webview::WebViewOptions::from_env();
        if let Some(dir) = options.preload_dir.filter(|d| !d.is_empty()) {
            resolved = resolved.with_preload_dir(dir);
        }
        resolved.devtools = options.devtools.unwrap_or(false);
        resolved
    }
}

/// One request header for `loadRequest`.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

impl From<HttpHeader> for trident_webview::HttpHeader {
    fn from(header: HttpHeader) -> Self {
        trident_webview::HttpHeader::new(header.name, header.value)
    }
}
