use tracing::debug;

/// Capability interface for the opportunistic clipboard copy.
///
/// Copy failures are a degraded-but-fine outcome; they are logged at debug
/// level and never surface as a run failure.
pub trait ClipboardSink {
    /// Copies the text, returning whether it landed on the clipboard.
    fn copy(&self, text: &str) -> bool;
}

/// OS clipboard backed by `arboard`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy(&self, text: &str) -> bool {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(text.to_string()) {
                Ok(()) => true,
                Err(e) => {
                    debug!("Clipboard copy failed: {}", e);
                    false
                }
            },
            Err(e) => {
                debug!("Clipboard unavailable: {}", e);
                false
            }
        }
    }
}

/// Clipboard that drops everything; the default for tests and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl ClipboardSink for NoClipboard {
    fn copy(&self, _text: &str) -> bool {
        false
    }
}
