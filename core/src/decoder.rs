use std::io::{Read, Write};

use log::{debug, info, trace};

use crate::classifier::{ClassifierState, ToneClassifier};
use crate::config::DetectorConfig;
use crate::error::Result;
use crate::formatter::{SymbolFormatter, LINE_BREAK};
use crate::goertzel;
use crate::segmenter::{Frame, FrameReader};
use crate::symbol::Symbol;

/// Counters for one finished decoding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub frames: u64,
    pub invalid_frames: u64,
    pub tokens: u64,
    pub line_breaks: u64,
}

/// One decoding session: frames in, text out.
///
/// Holds its own classifier and formatter state, so independent streams
/// need independent decoders.
pub struct Decoder {
    config: DetectorConfig,
    classifier: ToneClassifier,
    classifier_state: ClassifierState,
    formatter: SymbolFormatter,
    summary: DecodeSummary,
}

impl Decoder {
    /// Validate `config` and start a fresh session.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: ToneClassifier::from_config(&config),
            classifier_state: ClassifierState::default(),
            formatter: SymbolFormatter::new(config.flush_frames),
            summary: DecodeSummary::default(),
            config,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn classifier_state(&self) -> ClassifierState {
        self.classifier_state
    }

    /// Classify one frame without formatting
    pub fn classify_frame(&mut self, frame: &Frame) -> Symbol {
        let powers = goertzel::estimate(frame);
        self.classifier.classify(&powers, &mut self.classifier_state)
    }

    /// Classify and format one frame.
    pub fn process_frame(&mut self, frame: &Frame) -> Option<&'static str> {
        let symbol = self.classify_frame(frame);
        trace!("frame {}: {}", self.summary.frames, symbol);

        self.summary.frames += 1;
        if symbol == Symbol::Invalid {
            self.summary.invalid_frames += 1;
        }

        let token = self.formatter.push(symbol);
        match token {
            Some(LINE_BREAK) => {
                debug!("Long silence at frame {}", self.summary.frames);
                self.summary.line_breaks += 1;
            }
            Some(_) => self.summary.tokens += 1,
            None => {}
        }
        token
    }

    /// Decode `source` until end of stream, writing text to `sink`.
    ///
    /// Always ends the output with a line break. I/O errors abort the run.
    pub fn run<R: Read, W: Write>(&mut self, source: R, mut sink: W) -> Result<DecodeSummary> {
        let mut frames = FrameReader::new(source, self.config.encoding);

        while let Some(frame) = frames.next_frame()? {
            if let Some(token) = self.process_frame(&frame) {
                sink.write_all(token.as_bytes())?;
                if self.config.flush_each_token {
                    sink.flush()?;
                }
            }
        }

        sink.write_all(self.formatter.finish().as_bytes())?;
        sink.flush()?;

        info!(
            "Decoded {} frames: {} symbols, {} line breaks, {} invalid frames",
            self.summary.frames,
            self.summary.tokens,
            self.summary.line_breaks,
            self.summary.invalid_frames
        );
        Ok(self.summary)
    }

    pub fn summary(&self) -> DecodeSummary {
        self.summary
    }
}

/// Decode an in-memory sample buffer with a fresh session.
pub fn decode_bytes(samples: &[u8], config: DetectorConfig) -> Result<String> {
    let mut decoder = Decoder::new(config)?;
    let mut out = Vec::new();
    decoder.run(samples, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
