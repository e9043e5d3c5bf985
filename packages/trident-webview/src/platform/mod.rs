//! Native engine bindings.

#[cfg(target_os = "windows")]
mod mshtml;
#[cfg(target_os = "windows")]
pub mod windows;
