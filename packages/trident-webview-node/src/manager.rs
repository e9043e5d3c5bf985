use std::cell::RefCell;
use std::collections::HashMap;

use crate::events::WebViewEventHandlers;

/// Binding state. Lives in thread_local storage on the UI thread.
pub struct Manager {
    pub next_id: u32,
    pub event_handlers: HashMap<u32, WebViewEventHandlers>,
    pub initialized: bool,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            event_handlers: HashMap::new(),
            initialized: false,
        }
    }

    pub fn allocate_id(&mut self) -> napi::Result<u32> {
        let id = self.next_id;
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| napi::Error::from_reason("WebView ID space exhausted (u32 overflow)"))?;
        self.event_handlers.insert(id, WebViewEventHandlers::new());
        Ok(id)
    }
}

thread_local! {
    pub static MANAGER: RefCell<Manager> = RefCell::new(Manager::new());
}

pub fn with_manager<F, R>(f: F) -> R
where
    F: FnOnce(&mut Manager) -> R,
{
    MANAGER.with(|m| f(&mut m.borrow_mut()))
}

/// Clone one handler out of the manager without holding the borrow while it
/// runs. Engine events can arrive while a binding method has the manager
/// borrowed; those are dropped with a trace.
pub fn handler<T, F>(id: u32, select: F) -> Option<T>
where
    F: FnOnce(&WebViewEventHandlers) -> Option<&T>,
    T: Clone,
{
    MANAGER.with(|m| match m.try_borrow() {
        Ok(mgr) => mgr.event_handlers.get(&id).and_then(select).cloned(),
        Err(_) => {
            tracing::trace!(id, "manager busy, event dropped");
            None
        }
    })
}
