//! Keyboard accelerator routing.
//!
//! The host message loop owns keyboard input, so the engine never sees
//! shortcuts like Ctrl+C unless they are offered to it first. Every activated
//! adapter sits in a thread-wide registry; [`translate`] finds the adapter
//! whose container holds the message target and lets its active object
//! consume the message.

use std::cell::{Cell, RefCell};
use std::rc::Weak;

use tracing::debug;

use crate::engine::{InputMessage, WindowHandle};

/// What the router needs from a live adapter.
pub trait AcceleratorTarget {
    /// Whether `window` lives inside this adapter's container.
    fn owns(&self, window: WindowHandle) -> bool;
    /// Offer `msg` to the engine. `true` if it was consumed.
    fn translate_accelerator(&self, msg: &InputMessage) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdapterId(u64);

/// Live adapters, in no particular order.
#[derive(Default)]
pub struct AdapterRegistry {
    entries: Vec<(AdapterId, Weak<dyn AcceleratorTarget>)>,
}

impl AdapterRegistry {
    pub fn insert(&mut self, id: AdapterId, target: Weak<dyn AcceleratorTarget>) {
        if !self.contains(id) {
            self.entries.push((id, target));
        }
    }

    pub fn remove(&mut self, id: AdapterId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn contains(&self, id: AdapterId) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the entries, so callers can iterate while handlers mutate the
    /// registry.
    fn snapshot(&self) -> Vec<(AdapterId, Weak<dyn AcceleratorTarget>)> {
        self.entries.clone()
    }
}

thread_local! {
    static REGISTRY: RefCell<AdapterRegistry> = RefCell::new(AdapterRegistry::default());
    static NEXT_ID: Cell<u64> = const { Cell::new(1) };
    static INSTALLED: Cell<bool> = const { Cell::new(false) };
}

pub fn next_id() -> AdapterId {
    NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        AdapterId(id)
    })
}

/// Register an activated adapter, installing the router on first use.
pub fn register(id: AdapterId, target: Weak<dyn AcceleratorTarget>) {
    ensure_installed();
    REGISTRY.with(|r| r.borrow_mut().insert(id, target));
}

pub fn unregister(id: AdapterId) -> bool {
    REGISTRY.with(|r| r.borrow_mut().remove(id))
}

pub fn is_registered(id: AdapterId) -> bool {
    REGISTRY.with(|r| r.borrow().contains(id))
}

pub fn live_adapters() -> usize {
    REGISTRY.with(|r| r.borrow().len())
}

fn ensure_installed() {
    INSTALLED.with(|installed| {
        if !installed.replace(true) {
            debug!("accelerator router installed");
        }
    });
}

pub fn is_installed() -> bool {
    INSTALLED.with(Cell::get)
}

/// Offer a message from the host loop to the owning adapter. Returns `true`
/// if the engine consumed it and the loop must not dispatch it.
pub fn translate(msg: &InputMessage) -> bool {
    if !msg.is_keyboard() || !is_installed() {
        return false;
    }
    let snapshot = REGISTRY.with(|r| r.borrow().snapshot());
    for (id, target) in snapshot {
        // Torn down by an earlier handler during this scan.
        if !is_registered(id) {
            continue;
        }
        let Some(target) = target.upgrade() else {
            continue;
        };
        if target.owns(msg.target) {
            return target.translate_accelerator(msg);
        }
    }
    false
}
