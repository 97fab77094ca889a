//! Tone bin table and the frequency plans it covers.
//!
//! With N = 240 at 8 kHz every DFT bin is 33.3 Hz wide. The bin indices were
//! chosen to minimize the total distance between each nominal frequency and
//! the nearest bin. 697 Hz and 700 Hz land on the same bin, and 1477 Hz is
//! read through the 1500 Hz bin, so DTMF row 1 / column 3 overlaps MF
//! 700 + 1500.

use crate::FRAME_SAMPLES;

/// One monitored frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneBin {
    /// DFT bin index for an N-point frame
    pub k: u16,
    /// Goertzel feedback coefficient, `2 * cos(2 * pi * k / N)`
    pub coef: f32,
}

/// Number of monitored bins.
pub const NUM_BINS: usize = 18;

/// Fixed bin table. Order is referenced by the position constants below.
pub const TONE_BINS: [ToneBin; NUM_BINS] = [
    ToneBin { k: 11, coef: 1.917639 },  // 350
    ToneBin { k: 13, coef: 1.885283 },  // 440
    ToneBin { k: 14, coef: 1.867161 },  // 480
    ToneBin { k: 19, coef: 1.757634 },  // 620
    ToneBin { k: 21, coef: 1.705280 },  // 697 / 700
    ToneBin { k: 23, coef: 1.648252 },  // 770
    ToneBin { k: 26, coef: 1.554292 },  // 852
    ToneBin { k: 27, coef: 1.520812 },  // 900
    ToneBin { k: 28, coef: 1.486290 },  // 941
    ToneBin { k: 33, coef: 1.298896 },  // 1100
    ToneBin { k: 36, coef: 1.175571 },  // 1209
    ToneBin { k: 39, coef: 1.044997 },  // 1300
    ToneBin { k: 40, coef: 1.000000 },  // 1336
    ToneBin { k: 45, coef: 0.765367 },  // 1477 / 1500
    ToneBin { k: 49, coef: 0.568031 },  // 1633
    ToneBin { k: 51, coef: 0.466891 },  // 1700
    ToneBin { k: 72, coef: -0.618034 }, // 2400
    ToneBin { k: 78, coef: -0.907981 }, // 2600
];

// Call-progress bins
pub const X350: usize = 0;
pub const X440: usize = 1;
pub const X480: usize = 2;
pub const X620: usize = 3;

/// DTMF rows: 697, 770, 852, 941 Hz.
pub const DTMF_ROW_BINS: [usize; 4] = [4, 5, 6, 8];
/// DTMF columns: 1209, 1336, 1477, 1633 Hz.
pub const DTMF_COL_BINS: [usize; 4] = [10, 12, 13, 14];
/// MF high band: 700, 900, 1100, 1300, 1500, 1700, 2400, 2600 Hz.
pub const MF_BINS: [usize; 8] = [4, 7, 9, 11, 13, 15, 16, 17];

// Supervisory bins
pub const B2400: usize = 16;
pub const B2600: usize = 17;

/// Nominal DTMF row frequencies in Hz.
pub const DTMF_ROW_FREQS: [f32; 4] = [697.0, 770.0, 852.0, 941.0];
/// Nominal DTMF column frequencies in Hz.
pub const DTMF_COL_FREQS: [f32; 4] = [1209.0, 1336.0, 1477.0, 1633.0];
/// Nominal MF frequencies in Hz, same order as [`MF_BINS`].
pub const MF_FREQS: [f32; 8] = [700.0, 900.0, 1100.0, 1300.0, 1500.0, 1700.0, 2400.0, 2600.0];

pub const DIAL_TONE_FREQS: (f32, f32) = (350.0, 440.0);
pub const RING_FREQS: (f32, f32) = (440.0, 480.0);
pub const BUSY_FREQS: (f32, f32) = (480.0, 620.0);

/// Frequency at the center of DFT bin `k`.
pub fn bin_frequency(k: u16) -> f32 {
    k as f32 * crate::SAMPLE_RATE as f32 / FRAME_SAMPLES as f32
}
