use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::debug;

use crate::depth_pipeline::sinks::display::Key;

/// Key presses read from the controlling terminal.
///
/// The terminal is switched to raw mode only while a poll is waiting, so
/// single keys arrive without Enter and log lines written between polls
/// keep their normal line endings. Raw mode also swallows the interrupt
/// signal, which is why Ctrl-C is reported as [`Key::Escape`].
///
/// When there is no terminal to read from, key handling turns itself off
/// after the first failed poll.
pub struct TerminalKeys {
    enabled: bool,
}

/// Restores cooked mode when dropped.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            debug!("Failed to restore terminal mode: {}", e);
        }
    }
}

impl Default for TerminalKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalKeys {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn poll(&mut self, delay: Duration) -> Option<Key> {
        if !self.enabled {
            return None;
        }

        match Self::read_key(delay) {
            Ok(key) => key,
            Err(e) => {
                debug!("Terminal input unavailable, key handling disabled: {}", e);
                self.enabled = false;
                None
            }
        }
    }

    fn read_key(delay: Duration) -> io::Result<Option<Key>> {
        let _raw = RawMode::enable()?;
        while event::poll(delay)? {
            if let Event::Key(event) = event::read()? {
                if let Some(key) = key_from_event(event) {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }
}

/// Maps a key press to the keys the capture loop understands.
pub(crate) fn key_from_event(event: KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Escape),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}
