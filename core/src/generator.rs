//! Tone synthesizer producing 8-bit PCM at 8 kHz.
//!
//! Used to build labeled fixtures for the detector and by the CLI's
//! `generate` command.

use std::f32::consts::PI;

use crate::config::SampleEncoding;
use crate::error::{Result, ToneError};
use crate::symbol::Symbol;
use crate::tones::{
    BUSY_FREQS, DIAL_TONE_FREQS, DTMF_COL_FREQS, DTMF_ROW_FREQS, MF_FREQS, RING_FREQS,
};
use crate::SAMPLE_RATE;

/// Default tone length per dialed key
pub const DEFAULT_TONE_MS: u32 = 50;
/// Default gap after each dialed key
pub const DEFAULT_GAP_MS: u32 = 50;

/// Each component of a dual tone is scaled by this so the mix never clips.
const TONE_AMPLITUDE: f32 = 0.5;

/// Which tone plan to use for digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TonePlan {
    Dtmf,
    Mf,
}

/// Frequencies (Hz) that make up a symbol under `plan`.
///
/// MF-only codes ignore `plan`; so do supervisory and call-progress tones.
pub fn symbol_frequencies(symbol: Symbol, plan: TonePlan) -> Option<(f32, Option<f32>)> {
    let mf = |lo: usize, hi: usize| Some((MF_FREQS[lo], Some(MF_FREQS[hi])));
    let pair = |(a, b): (f32, f32)| Some((a, Some(b)));

    match symbol {
        Symbol::Digit(_) | Symbol::Star | Symbol::Pound | Symbol::Letter(_)
            if plan == TonePlan::Dtmf =>
        {
            let (row, col) = keypad_position(symbol)?;
            Some((DTMF_ROW_FREQS[row], Some(DTMF_COL_FREQS[col])))
        }
        Symbol::Digit(d) => match d {
            1 => mf(0, 1),
            2 => mf(0, 2),
            3 => mf(1, 2),
            4 => mf(0, 3),
            5 => mf(1, 3),
            6 => mf(2, 3),
            7 => mf(0, 4),
            8 => mf(1, 4),
            9 => mf(2, 4),
            0 => mf(3, 4),
            _ => None,
        },
        Symbol::C11 => mf(0, 5),
        Symbol::C12 => mf(1, 5),
        Symbol::Kp1 => mf(2, 5),
        Symbol::Kp2 => mf(3, 5),
        Symbol::St => mf(4, 5),
        Symbol::Tone2400 => Some((MF_FREQS[6], None)),
        Symbol::Tone2600 => Some((MF_FREQS[7], None)),
        Symbol::Tone2400And2600 => mf(6, 7),
        Symbol::DialTone => pair(DIAL_TONE_FREQS),
        Symbol::Ring => pair(RING_FREQS),
        Symbol::Busy => pair(BUSY_FREQS),
        Symbol::Star | Symbol::Pound | Symbol::Letter(_) | Symbol::Silence | Symbol::Invalid => {
            None
        }
    }
}

fn keypad_position(symbol: Symbol) -> Option<(usize, usize)> {
    match symbol {
        Symbol::Digit(0) => Some((3, 1)),
        Symbol::Digit(d @ 1..=9) => {
            let idx = (d - 1) as usize;
            Some((idx / 3, idx % 3))
        }
        Symbol::Star => Some((3, 0)),
        Symbol::Pound => Some((3, 2)),
        Symbol::Letter(l @ 0..=3) => Some((l as usize, 3)),
        _ => None,
    }
}

/// Synthesizes tones and silences as sample bytes.
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    encoding: SampleEncoding,
    tone_ms: u32,
    gap_ms: u32,
}

impl Default for ToneGenerator {
    fn default() -> Self {
        Self::new(SampleEncoding::Signed)
    }
}

impl ToneGenerator {
    pub fn new(encoding: SampleEncoding) -> Self {
        Self {
            encoding,
            tone_ms: DEFAULT_TONE_MS,
            gap_ms: DEFAULT_GAP_MS,
        }
    }

    /// Set tone and gap lengths used by [`dial`](Self::dial) and
    /// [`sequence`](Self::sequence).
    pub fn with_timing(mut self, tone_ms: u32, gap_ms: u32) -> Self {
        self.tone_ms = tone_ms;
        self.gap_ms = gap_ms;
        self
    }

    pub fn encoding(&self) -> SampleEncoding {
        self.encoding
    }

    fn sample_count(duration_ms: u32) -> usize {
        (duration_ms as usize * SAMPLE_RATE) / 1000
    }

    /// Two mixed sine tones, phase starting at zero.
    pub fn two_tones(&self, freq1: f32, freq2: f32, duration_ms: u32) -> Vec<u8> {
        self.render(freq1, Some(freq2), duration_ms)
    }

    pub fn single_tone(&self, freq: f32, duration_ms: u32) -> Vec<u8> {
        self.render(freq, None, duration_ms)
    }

    pub fn silence(&self, duration_ms: u32) -> Vec<u8> {
        vec![self.encoding.zero(); Self::sample_count(duration_ms)]
    }

    fn render(&self, freq1: f32, freq2: Option<f32>, duration_ms: u32) -> Vec<u8> {
        let sample_rate = SAMPLE_RATE as f32;
        (0..Self::sample_count(duration_ms))
            .map(|i| {
                let t = i as f32 / sample_rate;
                let mut value = (2.0 * PI * freq1 * t).sin();
                if let Some(freq2) = freq2 {
                    value += (2.0 * PI * freq2 * t).sin();
                }
                self.encoding.quantize(value * TONE_AMPLITUDE)
            })
            .collect()
    }

    /// Tone for `symbol` under `plan`.
    pub fn symbol(&self, symbol: Symbol, plan: TonePlan, duration_ms: u32) -> Result<Vec<u8>> {
        let (freq1, freq2) =
            symbol_frequencies(symbol, plan).ok_or(ToneError::NotGeneratable(symbol))?;
        Ok(self.render(freq1, freq2, duration_ms))
    }

    /// Play each symbol followed by a gap.
    pub fn sequence(&self, symbols: &[Symbol], plan: TonePlan) -> Result<Vec<u8>> {
        let mut samples = Vec::new();
        for &symbol in symbols {
            samples.extend(self.symbol(symbol, plan, self.tone_ms)?);
            samples.extend(self.silence(self.gap_ms));
        }
        Ok(samples)
    }

    /// Dial a keypad string as DTMF.
    ///
    /// Keys 0-9, `*`, `#` and A-D are played as tones; any other character
    /// becomes a gap. Every character is followed by a gap.
    pub fn dial(&self, number: &str) -> Vec<u8> {
        let mut samples = Vec::new();
        for c in number.chars() {
            if let Some(symbol) = Symbol::from_key(c) {
                if let Ok(tone) = self.symbol(symbol, TonePlan::Dtmf, self.tone_ms) {
                    samples.extend(tone);
                }
            }
            samples.extend(self.silence(self.gap_ms));
        }
        samples
    }

    /// Like [`dial`](Self::dial) but rejects characters with no tone.
    pub fn dial_strict(&self, number: &str) -> Result<Vec<u8>> {
        let symbols = number
            .chars()
            .map(|c| Symbol::from_key(c).ok_or(ToneError::UnsupportedSymbol(c)))
            .collect::<Result<Vec<_>>>()?;
        self.sequence(&symbols, TonePlan::Dtmf)
    }
}
