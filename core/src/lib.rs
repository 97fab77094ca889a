//! Telephone signaling tone decoder
//!
//! Reads 8-bit PCM at 8 kHz in 30 ms frames, measures 18 tones with the
//! Goertzel algorithm and reports DTMF, MF, supervisory and call-progress
//! symbols as text.

pub mod error;
pub mod config;
pub mod tones;
pub mod symbol;
pub mod segmenter;
pub mod goertzel;
pub mod classifier;
pub mod formatter;
pub mod decoder;
pub mod generator;

pub use classifier::{ClassifierState, ToneClassifier};
pub use config::{DetectorConfig, SampleEncoding};
pub use decoder::{decode_bytes, DecodeSummary, Decoder};
pub use error::{Result, ToneError};
pub use formatter::{FormatterState, SymbolFormatter};
pub use generator::{ToneGenerator, TonePlan};
pub use goertzel::PowerVector;
pub use segmenter::{Frame, FrameReader};
pub use symbol::Symbol;

// Sampling configuration
pub const SAMPLE_RATE: usize = 8000;
pub const FRAME_DURATION_MS: usize = 30;
pub const FRAME_SAMPLES: usize = (SAMPLE_RATE * FRAME_DURATION_MS) / 1000; // 240
