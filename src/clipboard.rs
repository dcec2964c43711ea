use std::sync::Mutex;

use crate::error::{NitpickError, Result};

pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<()>;
}

/// The OS clipboard via `arboard`.
///
/// On X11 and Wayland the copied text is served by whoever owns the
/// selection, so one handle is kept for the life of the app. Dropping it
/// after each copy would take the contents with it.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                tracing::warn!("clipboard unavailable at startup: {}", e);
                None
            }
        };
        Self {
            inner: Mutex::new(inner),
        }
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| NitpickError::Clipboard("clipboard lock poisoned".to_string()))?;
        // Retry here if it was unavailable at startup.
        if inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| NitpickError::Clipboard(e.to_string()))?;
            *inner = Some(clipboard);
        }
        match inner.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text)
                .map_err(|e| NitpickError::Clipboard(e.to_string())),
            None => Err(NitpickError::Clipboard("no clipboard".to_string())),
        }
    }
}
