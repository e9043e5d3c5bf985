#[macro_use]
extern crate napi_derive;

#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
mod events;
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
mod manager;
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
mod options;
#[cfg(target_os = "windows")]
mod webview;

use tracing_subscriber::EnvFilter;

use manager::with_manager;

/// Initialize the webview system on the calling (UI) thread.
/// Must be called once before creating any webviews.
#[napi]
pub fn init() -> napi::Result<()> {
    with_manager(|mgr| {
        if mgr.initialized {
            return Ok(());
        }

        init_logging();

        #[cfg(target_os = "windows")]
        {
            trident_webview::initialize()
                .map_err(|e| napi::Error::from_reason(format!("OLE init failed: {}", e)))?;
            mgr.initialized = true;
            Ok(())
        }

        #[cfg(not(target_os = "windows"))]
        {
            Err(napi::Error::from_reason(
                "Unsupported platform. The Trident webview requires Windows.",
            ))
        }
    })
}

/// Process pending native UI events. Keyboard accelerators are routed to the
/// webview that owns the focused window before normal dispatch.
/// Call this periodically (e.g., every 16ms via setInterval).
#[napi]
pub fn pump_events() -> napi::Result<()> {
    let initialized = with_manager(|mgr| mgr.initialized);
    if !initialized {
        return Err(napi::Error::from_reason(
            "Trident webview not initialized. Call init() first.",
        ));
    }

    // The manager must not be borrowed here: dispatched messages reach the
    // engine, whose events look handlers up in it.
    #[cfg(target_os = "windows")]
    trident_webview::pump_pending();

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`). A subscriber
/// installed by the embedding process wins.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
