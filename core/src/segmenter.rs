use std::io::{ErrorKind, Read};

use log::debug;

use crate::config::SampleEncoding;
use crate::error::Result;
use crate::FRAME_SAMPLES;

/// One full frame of normalized samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    samples: [f32; FRAME_SAMPLES],
}

impl Frame {
    /// Build a frame from raw sample bytes.
    pub fn from_bytes(bytes: &[u8; FRAME_SAMPLES], encoding: SampleEncoding) -> Self {
        let mut samples = [0.0f32; FRAME_SAMPLES];
        for (sample, &byte) in samples.iter_mut().zip(bytes.iter()) {
            *sample = encoding.normalize(byte);
        }
        Self { samples }
    }

    /// Build a frame from samples already in [-1.0, 1.0].
    pub fn from_normalized(samples: [f32; FRAME_SAMPLES]) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// Cuts a byte stream into whole frames.
///
/// A trailing partial frame is dropped.
pub struct FrameReader<R> {
    source: R,
    encoding: SampleEncoding,
    buffer: [u8; FRAME_SAMPLES],
    frames_read: u64,
}

impl<R: Read> FrameReader<R> {
    pub fn new(source: R, encoding: SampleEncoding) -> Self {
        Self {
            source,
            encoding,
            buffer: [0u8; FRAME_SAMPLES],
            frames_read: 0,
        }
    }

    /// Read the next frame, or `None` at end of stream.
    ///
    /// Short reads are retried until the frame is full.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        let mut filled = 0;
        while filled < FRAME_SAMPLES {
            match self.source.read(&mut self.buffer[filled..]) {
                Ok(0) => {
                    if filled > 0 {
                        debug!(
                            "Discarding {} trailing samples after frame {}",
                            filled, self.frames_read
                        );
                    }
                    return Ok(None);
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        self.frames_read += 1;
        Ok(Some(Frame::from_bytes(&self.buffer, self.encoding)))
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}
