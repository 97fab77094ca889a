use log::trace;

use crate::config::DEFAULT_FLUSH_FRAMES;
use crate::symbol::Symbol;

/// Line break written after a long silence and at end of stream.
pub const LINE_BREAK: &str = "\n";

/// Dedup and silence-run memory for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatterState {
    pub last_emitted: Symbol,
    /// Consecutive silent frames, `None` once the current run has been flushed
    pub silence_run: Option<usize>,
}

impl Default for FormatterState {
    fn default() -> Self {
        Self {
            last_emitted: Symbol::Silence,
            silence_run: Some(0),
        }
    }
}

/// Turns per-frame symbols into output text.
#[derive(Debug, Clone)]
pub struct SymbolFormatter {
    flush_frames: usize,
    state: FormatterState,
}

impl Default for SymbolFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_FLUSH_FRAMES)
    }
}

impl SymbolFormatter {
    pub fn new(flush_frames: usize) -> Self {
        Self {
            flush_frames,
            state: FormatterState::default(),
        }
    }

    pub fn state(&self) -> &FormatterState {
        &self.state
    }

    /// Feed one frame's symbol; returns the text to write, if any.
    pub fn push(&mut self, symbol: Symbol) -> Option<&'static str> {
        push_symbol(symbol, &mut self.state, self.flush_frames)
    }

    /// Terminator written once the stream ends.
    pub fn finish(&mut self) -> &'static str {
        LINE_BREAK
    }
}

/// One formatter step over explicit state.
///
/// `Invalid` is ignored entirely. A silence run of `flush_frames` frames
/// yields one line break; counting then stays suspended until a tone
/// appears. A tone is written only when it differs from the previous
/// symbol and the previous symbol was a held condition (silence,
/// supervisory or call progress).
pub fn push_symbol(
    symbol: Symbol,
    state: &mut FormatterState,
    flush_frames: usize,
) -> Option<&'static str> {
    if symbol == Symbol::Invalid {
        return None;
    }

    let last = state.last_emitted;
    state.last_emitted = symbol;

    if symbol == Symbol::Silence {
        if let Some(run) = state.silence_run.as_mut() {
            *run += 1;
            if *run == flush_frames {
                trace!("Silence run reached {} frames, breaking line", flush_frames);
                state.silence_run = None;
                return Some(LINE_BREAK);
            }
        }
        return None;
    }

    state.silence_run = Some(0);

    if symbol != last && last.is_held_condition() {
        Some(symbol.display_text())
    } else {
        None
    }
}
