//! The preload bundle: bootstrap scripts evaluated after every top-level
//! navigation so the page can reach `external.post` through the usual
//! application API.
//!
//! The bundle is built on first use and kept for the life of the UI thread.
//! Every injection gets a clone of the same `Rc<str>`.

use std::cell::OnceCell;
use std::path::Path;
use std::rc::Rc;

use tracing::debug;

use crate::error::{Result, WebViewError};

/// Constituent scripts in evaluation order. Each may rely on globals defined
/// by the ones before it.
pub const PRELOAD_SCRIPTS: [&str; 3] = ["preload_trident.js", "es6-promise.auto.min.js", "preload.js"];

// The scripts contain top-level `return` statements.
const PROLOGUE: &str = "(function(){\n";
const EPILOGUE: &str = "\n})();\n";

thread_local! {
    static BUNDLE: OnceCell<Rc<str>> = const { OnceCell::new() };
}

/// The cached bundle, building it from `dir` if this is the first call.
///
/// A failed build is not cached.
pub fn bundle(dir: &Path) -> Result<Rc<str>> {
    if let Some(cached) = cached() {
        return Ok(cached);
    }
    let built: Rc<str> = build(dir)?.into();
    debug!(dir = %dir.display(), len = built.len(), "preload bundle built");
    Ok(BUNDLE.with(|cell| Rc::clone(cell.get_or_init(|| built))))
}

/// The bundle if it has already been built.
pub fn cached() -> Option<Rc<str>> {
    BUNDLE.with(|cell| cell.get().cloned())
}

/// Concatenate [`PRELOAD_SCRIPTS`] from `dir` inside an IIFE. Uncached.
pub fn build(dir: &Path) -> Result<String> {
    let mut script = String::from(PROLOGUE);
    for name in PRELOAD_SCRIPTS {
        let path = dir.join(name);
        let bytes = std::fs::read(&path).map_err(|source| WebViewError::PreloadIo {
            path: path.clone(),
            source,
        })?;
        script.push_str(&String::from_utf8_lossy(&bytes));
    }
    script.push_str(EPILOGUE);
    Ok(script)
}

#[cfg(test)]
pub(crate) fn write_scripts(dir: &Path) {
    for name in PRELOAD_SCRIPTS {
        std::fs::write(dir.join(name), format!("/*{name}*/")).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_is_wrapped_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        write_scripts(dir.path());

        let script = build(dir.path()).unwrap();
        assert_eq!(
            script,
            "(function(){\n/*preload_trident.js*//*es6-promise.auto.min.js*//*preload.js*/\n})();\n"
        );
    }

    #[test]
    fn missing_script_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("preload_trident.js"), "return;").unwrap();

        match build(dir.path()) {
            Err(WebViewError::PreloadIo { path, .. }) => {
                assert!(path.ends_with("es6-promise.auto.min.js"))
            }
            other => panic!("expected PreloadIo, got {other:?}"),
        }
    }

    #[test]
    fn bundle_is_built_once_and_shared() {
        let dir = tempfile::tempdir().unwrap();
        write_scripts(dir.path());

        let first = bundle(dir.path()).unwrap();
        // Later calls must not touch the filesystem again.
        for name in PRELOAD_SCRIPTS {
            std::fs::remove_file(dir.path().join(name)).unwrap();
        }
        let second = bundle(dir.path()).unwrap();
        let third = bundle(Path::new("/nonexistent")).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert!(Rc::ptr_eq(&first, &third));
    }

    #[test]
    fn failed_build_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        assert!(bundle(dir.path()).is_err());
        assert!(cached().is_none());

        write_scripts(dir.path());
        assert!(bundle(dir.path()).is_ok());
        assert!(cached().is_some());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        write_scripts(dir.path());
        std::fs::write(dir.path().join("preload.js"), [b'a', 0xff, b'b']).unwrap();

        let script = build(dir.path()).unwrap();
        assert!(script.contains("a\u{fffd}b"));
    }
}
