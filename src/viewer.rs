//! Best-effort side effects performed after the output is written.
//!
//! Neither launching a browser nor the delayed removal can fail a
//! conversion: errors are logged here and returned so the caller can tell
//! the user, but the exit status is decided before these run.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::SideEffectError;

/// Outcome of a best-effort side effect.
pub type SideEffect = std::result::Result<(), SideEffectError>;

/// Open `path` in a browser without waiting for it.
///
/// Uses `browser` when given, otherwise the platform opener
/// (`xdg-open`, `open` or `start`).
pub fn open_in_browser(path: &Path, browser: Option<&str>) -> SideEffect {
    let launched = match browser {
        Some(app) => open::with_detached(path, app),
        None => open::that_detached(path),
    };

    match launched {
        Ok(()) => {
            info!(path = %path.display(), browser = browser.unwrap_or("default"), "Launched browser");
            Ok(())
        }
        Err(source) => {
            warn!(path = %path.display(), error = %source, "Browser launch failed");
            Err(SideEffectError::Launch {
                browser: browser.unwrap_or("system opener").to_string(),
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Block for `delay`, then delete `path`.
///
/// The delay gives an externally launched browser time to load the file;
/// nothing synchronizes the two processes.
pub fn remove_after(path: &Path, delay: Duration) -> SideEffect {
    if !delay.is_zero() {
        debug!(path = %path.display(), delay = ?delay, "Waiting before removal");
        std::thread::sleep(delay);
    }

    match std::fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "Removed output file");
            Ok(())
        }
        Err(source) => {
            warn!(path = %path.display(), error = %source, "Failed to remove output file");
            Err(SideEffectError::Remove {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
