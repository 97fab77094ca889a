use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ToneError};

/// Default number of consecutive silent frames before a line break (3 s).
pub const DEFAULT_FLUSH_FRAMES: usize = 100;

/// Any bin above this fraction of the loudest bin counts as "on".
pub const DEFAULT_RANGE_FRACTION: f32 = 0.1;

/// Minimum power the loudest bin must reach before a frame is considered
/// anything but silence. Tuned to samples normalized to [-1.0, 1.0].
pub const DEFAULT_SILENCE_FLOOR: f32 = 100.0;

/// How one 8-bit sample byte maps to an amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleEncoding {
    /// Two's complement, zero at 0.
    #[default]
    Signed,
    /// Offset binary, zero at 128.
    Unsigned,
}

impl SampleEncoding {
    /// Normalize one sample byte into [-1.0, 1.0).
    pub fn normalize(self, byte: u8) -> f32 {
        match self {
            SampleEncoding::Signed => (byte as i8) as f32 / 128.0,
            SampleEncoding::Unsigned => (byte as i32 - 128) as f32 / 128.0,
        }
    }

    /// Convert an amplitude in [-1.0, 1.0] to a sample byte (full scale 127).
    pub fn quantize(self, value: f32) -> u8 {
        let scaled = (value.clamp(-1.0, 1.0) * 127.0).round() as i32;
        match self {
            SampleEncoding::Signed => (scaled as i8) as u8,
            SampleEncoding::Unsigned => (scaled + 128) as u8,
        }
    }

    /// Byte value of a zero amplitude sample
    pub fn zero(self) -> u8 {
        self.quantize(0.0)
    }
}

impl FromStr for SampleEncoding {
    type Err = ToneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "signed" | "s8" => Ok(SampleEncoding::Signed),
            "unsigned" | "u8" => Ok(SampleEncoding::Unsigned),
            other => Err(ToneError::InvalidConfig(format!(
                "unsupported sample encoding '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SampleEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleEncoding::Signed => write!(f, "signed"),
            SampleEncoding::Unsigned => write!(f, "unsigned"),
        }
    }
}

/// Settings for one decoding session
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    pub encoding: SampleEncoding,
    /// Silent frames before a line break is written.
    pub flush_frames: usize,
    /// Relative on-threshold as a fraction of the loudest bin.
    pub range_fraction: f32,
    /// Absolute power floor for the loudest bin.
    pub silence_floor: f32,
    /// Flush the sink after every emitted token.
    pub flush_each_token: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            encoding: SampleEncoding::Signed,
            flush_frames: DEFAULT_FLUSH_FRAMES,
            range_fraction: DEFAULT_RANGE_FRACTION,
            silence_floor: DEFAULT_SILENCE_FLOOR,
            flush_each_token: true,
        }
    }
}

impl DetectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(mut self, encoding: SampleEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_flush_frames(mut self, frames: usize) -> Self {
        self.flush_frames = frames;
        self
    }

    pub fn with_range_fraction(mut self, fraction: f32) -> Self {
        self.range_fraction = fraction;
        self
    }

    pub fn with_silence_floor(mut self, floor: f32) -> Self {
        self.silence_floor = floor;
        self
    }

    pub fn with_flush_each_token(mut self, flush: bool) -> Self {
        self.flush_each_token = flush;
        self
    }

    /// Reject settings that would make the detector meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.flush_frames == 0 {
            return Err(ToneError::InvalidConfig(
                "flush threshold must be at least one frame".to_string(),
            ));
        }
        if !self.range_fraction.is_finite()
            || self.range_fraction <= 0.0
            || self.range_fraction >= 1.0
        {
            return Err(ToneError::InvalidConfig(format!(
                "range fraction must be in (0, 1), got {}",
                self.range_fraction
            )));
        }
        if !self.silence_floor.is_finite() || self.silence_floor < 0.0 {
            return Err(ToneError::InvalidConfig(format!(
                "silence floor must be a non-negative number, got {}",
                self.silence_floor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_signed() {
        let enc = SampleEncoding::Signed;
        assert_eq!(enc.normalize(0), 0.0);
        assert_eq!(enc.normalize(0x80), -1.0);
        assert_eq!(enc.normalize(64), 0.5);
        assert!((enc.normalize(127) - 127.0 / 128.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_unsigned() {
        let enc = SampleEncoding::Unsigned;
        assert_eq!(enc.normalize(128), 0.0);
        assert_eq!(enc.normalize(0), -1.0);
        assert_eq!(enc.normalize(192), 0.5);
    }

    #[test]
    fn test_quantize_matches_normalize_zero_point() {
        for enc in [SampleEncoding::Signed, SampleEncoding::Unsigned] {
            assert_eq!(enc.normalize(enc.zero()), 0.0);
            let byte = enc.quantize(0.5);
            assert!((enc.normalize(byte) - 0.5).abs() < 0.01, "{}", enc);
        }
        assert_eq!(SampleEncoding::Signed.quantize(-1.0), (-127i8) as u8);
        assert_eq!(SampleEncoding::Unsigned.quantize(1.0), 255);
        assert_eq!(SampleEncoding::Unsigned.quantize(3.0), 255);
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("signed".parse::<SampleEncoding>().unwrap(), SampleEncoding::Signed);
        assert_eq!("U8".parse::<SampleEncoding>().unwrap(), SampleEncoding::Unsigned);
        assert!(matches!(
            "mulaw".parse::<SampleEncoding>(),
            Err(ToneError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = DetectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.flush_frames, 100);
        assert_eq!(config.range_fraction, 0.1);
        assert_eq!(config.encoding, SampleEncoding::Signed);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(DetectorConfig::new().with_flush_frames(0).validate().is_err());
        assert!(DetectorConfig::new().with_range_fraction(0.0).validate().is_err());
        assert!(DetectorConfig::new().with_range_fraction(1.5).validate().is_err());
        assert!(DetectorConfig::new()
            .with_range_fraction(f32::NAN)
            .validate()
            .is_err());
        assert!(DetectorConfig::new().with_silence_floor(-1.0).validate().is_err());
    }
}
