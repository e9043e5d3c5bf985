//! Hosting-site policy.
//!
//! The engine talks to its host through one site object that answers for
//! several protocol roles at once. [`Capability`] names those roles; the
//! constants below are the answers the site gives when the engine asks about
//! UI chrome.

/// Protocol roles implemented by the hosting site, each reachable through the
/// site's type query (`QueryInterface` on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// `IOleClientSite`: container services for an embedded object.
    ClientSite,
    /// `IOleInPlaceSite`: window and geometry for in-place activation.
    InPlaceSite,
    /// `IDocHostUIHandler`: context menus, host flags, `external` object.
    UiHost,
    /// `IDispatch`: the `external` object seen by page script.
    External,
    /// `DWebBrowserEvents2`: lifecycle notifications.
    EventSink,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::ClientSite,
        Capability::InPlaceSite,
        Capability::UiHost,
        Capability::External,
        Capability::EventSink,
    ];

    pub fn interface_name(self) -> &'static str {
        match self {
            Capability::ClientSite => "IOleClientSite",
            Capability::InPlaceSite => "IOleInPlaceSite",
            Capability::UiHost => "IDocHostUIHandler",
            Capability::External => "IDispatch",
            Capability::EventSink => "DWebBrowserEvents2",
        }
    }
}

const DOCHOSTUIFLAG_NO3DBORDER: u32 = 0x0000_0004;
const DOCHOSTUIFLAG_THEME: u32 = 0x0004_0000;
const DOCHOSTUIFLAG_DPI_AWARE: u32 = 0x4000_0000;

/// Flags OR-ed into the engine's host info.
pub const HOST_UI_FLAGS: u32 = DOCHOSTUIFLAG_NO3DBORDER | DOCHOSTUIFLAG_DPI_AWARE | DOCHOSTUIFLAG_THEME;

/// Context menu id for form controls.
pub const CONTEXT_MENU_CONTROL: u32 = 2;
/// Context menu id for a text selection.
pub const CONTEXT_MENU_TEXTSELECT: u32 = 4;

/// Whether the engine may show its own context menu of kind `menu_id`.
/// Only selection and control menus survive, so copy/paste stays reachable.
pub fn allows_native_context_menu(menu_id: u32) -> bool {
    matches!(menu_id, CONTEXT_MENU_CONTROL | CONTEXT_MENU_TEXTSELECT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_edit_menus_are_native() {
        assert!(allows_native_context_menu(CONTEXT_MENU_TEXTSELECT));
        assert!(allows_native_context_menu(CONTEXT_MENU_CONTROL));
        assert!(!allows_native_context_menu(0)); // CONTEXT_MENU_DEFAULT
        assert!(!allows_native_context_menu(5)); // CONTEXT_MENU_ANCHOR
    }

    #[test]
    fn host_flags() {
        assert_eq!(HOST_UI_FLAGS, 0x4004_0004);
    }

    #[test]
    fn every_capability_has_an_interface() {
        let names: Vec<_> = Capability::ALL.iter().map(|c| c.interface_name()).collect();
        assert_eq!(
            names,
            [
                "IOleClientSite",
                "IOleInPlaceSite",
                "IDocHostUIHandler",
                "IDispatch",
                "DWebBrowserEvents2"
            ]
        );
    }
}
