use std::path::PathBuf;

/// Environment variable that overrides [`WebViewOptions::preload_dir`].
pub const PRELOAD_DIR_ENV: &str = "TRIDENT_WEBVIEW_PRELOAD_DIR";

/// Options for creating a webview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebViewOptions {
    /// Directory holding the bootstrap scripts injected after every
    /// top-level navigation. Default: `<exe dir>/dist/ui`
    pub preload_dir: PathBuf,
    /// Requested devtools state. The Trident control has no devtools, so this
    /// is only recorded. Default: false
    pub devtools: bool,
}

impl Default for WebViewOptions {
    fn default() -> Self {
        Self {
            preload_dir: default_preload_dir(),
            devtools: false,
        }
    }
}

impl WebViewOptions {
    /// Defaults, with the preload directory taken from
    /// `TRIDENT_WEBVIEW_PRELOAD_DIR` when set and non-empty.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(dir) = std::env::var_os(PRELOAD_DIR_ENV).filter(|v| !v.is_empty()) {
            options.preload_dir = PathBuf::from(dir);
        }
        options
    }

    pub fn with_preload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.preload_dir = dir.into();
        self
    }
}

fn default_preload_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("dist").join("ui")))
        .unwrap_or_else(|| PathBuf::from("dist").join("ui"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dir_ends_in_dist_ui() {
        let options = WebViewOptions::default();
        assert!(options.preload_dir.ends_with("dist/ui"));
        assert!(!options.devtools);
    }

    #[test]
    fn builder_overrides_dir() {
        let options = WebViewOptions::default().with_preload_dir("/opt/app/ui");
        assert_eq!(options.preload_dir, PathBuf::from("/opt/app/ui"));
    }
}
