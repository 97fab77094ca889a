//! Maps one power vector to one symbol.
//!
//! Decision order for two active bins: call progress, supervisory pair,
//! DTMF row/column, MF pair. DTMF 3 and MF 7 use the same two bins; the
//! frame is read as MF 7 only between KP and ST.

use crate::config::{DetectorConfig, DEFAULT_RANGE_FRACTION, DEFAULT_SILENCE_FLOOR};
use crate::goertzel::PowerVector;
use crate::symbol::Symbol;
use crate::tones::{
    B2400, B2600, DTMF_COL_BINS, DTMF_ROW_BINS, MF_BINS, NUM_BINS, X350, X440, X480, X620,
};

/// Cross-frame classifier memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierState {
    /// Set by KP, cleared by ST
    pub in_mf_bracket: bool,
}

/// Call-progress bin pairs.
const CALL_PROGRESS: [(usize, usize, Symbol); 3] = [
    (X350, X440, Symbol::DialTone),
    (X440, X480, Symbol::Ring),
    (X480, X620, Symbol::Busy),
];

/// DTMF keypad by (row, column). The (0, 2) cell is the DTMF 3 / MF 7 overlap.
const DTMF_KEYPAD: [[Symbol; 4]; 4] = [
    [Symbol::Digit(1), Symbol::Digit(2), Symbol::Digit(3), Symbol::Letter(0)],
    [Symbol::Digit(4), Symbol::Digit(5), Symbol::Digit(6), Symbol::Letter(1)],
    [Symbol::Digit(7), Symbol::Digit(8), Symbol::Digit(9), Symbol::Letter(2)],
    [Symbol::Star, Symbol::Digit(0), Symbol::Pound, Symbol::Letter(3)],
];

const DTMF_MF_OVERLAP: (usize, usize) = (0, 2);

/// MF pairs indexed by [upper][lower] position in [`MF_BINS`].
/// `Invalid` marks combinations with no meaning in the tone plan,
/// including 2400 paired with anything below it.
const MF_PAIRS: [[Symbol; 8]; 8] = {
    use Symbol::*;
    const I: Symbol = Invalid;
    [
        [I, I, I, I, I, I, I, I],
        [Digit(1), I, I, I, I, I, I, I],
        [Digit(2), Digit(3), I, I, I, I, I, I],
        [Digit(4), Digit(5), Digit(6), I, I, I, I, I],
        [Digit(7), Digit(8), Digit(9), Digit(0), I, I, I, I],
        [C11, C12, Kp1, Kp2, St, I, I, I],
        [I, I, I, I, I, I, I, I],
        [I, I, I, I, I, I, Tone2400And2600, I],
    ]
};

/// Stateless thresholds plus the decision tables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneClassifier {
    silence_floor: f32,
    range_fraction: f32,
}

impl Default for ToneClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SILENCE_FLOOR, DEFAULT_RANGE_FRACTION)
    }
}

impl ToneClassifier {
    pub fn new(silence_floor: f32, range_fraction: f32) -> Self {
        Self {
            silence_floor,
            range_fraction,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.silence_floor, config.range_fraction)
    }

    /// Classify one frame's power vector.
    ///
    /// Only KP and ST change `state`.
    pub fn classify(&self, powers: &PowerVector, state: &mut ClassifierState) -> Symbol {
        let max_power = powers.max();
        if max_power < self.silence_floor {
            return Symbol::Silence;
        }

        let cutoff = self.range_fraction * max_power;
        let mut on = [false; NUM_BINS];
        for (flag, &power) in on.iter_mut().zip(powers.as_slice()) {
            *flag = power > cutoff;
        }

        match on.iter().filter(|&&b| b).count() {
            0 => Symbol::Silence,
            1 => classify_single(&on),
            2 => classify_pair(&on, state),
            _ => Symbol::Invalid,
        }
    }
}

fn classify_single(on: &[bool; NUM_BINS]) -> Symbol {
    if on[B2400] {
        Symbol::Tone2400
    } else if on[B2600] {
        Symbol::Tone2600
    } else {
        Symbol::Invalid
    }
}

fn classify_pair(on: &[bool; NUM_BINS], state: &mut ClassifierState) -> Symbol {
    for &(a, b, symbol) in CALL_PROGRESS.iter() {
        if on[a] && on[b] {
            return symbol;
        }
    }

    if on[B2400] && on[B2600] {
        return Symbol::Tone2400And2600;
    }

    if let Some(symbol) = decode_dtmf(on, state) {
        return symbol;
    }

    decode_mf(on, state).unwrap_or(Symbol::Invalid)
}

/// Index of the single active bin among `bins`, if exactly one is on.
fn single_active(on: &[bool; NUM_BINS], bins: &[usize]) -> Option<usize> {
    let mut active = bins.iter().enumerate().filter(|(_, bin)| on[**bin]);
    match (active.next(), active.next()) {
        (Some((idx, _)), None) => Some(idx),
        _ => None,
    }
}

fn decode_dtmf(on: &[bool; NUM_BINS], state: &ClassifierState) -> Option<Symbol> {
    let row = single_active(on, &DTMF_ROW_BINS)?;
    let col = single_active(on, &DTMF_COL_BINS)?;

    if (row, col) == DTMF_MF_OVERLAP && state.in_mf_bracket {
        return None;
    }
    Some(DTMF_KEYPAD[row][col])
}

fn decode_mf(on: &[bool; NUM_BINS], state: &mut ClassifierState) -> Option<Symbol> {
    let mut active = MF_BINS
        .iter()
        .enumerate()
        .filter(|(_, bin)| on[**bin])
        .map(|(idx, _)| idx);

    let lower = active.next()?;
    let upper = active.next()?;
    if active.next().is_some() {
        return None;
    }

    let symbol = MF_PAIRS[upper][lower];
    match symbol {
        Symbol::Kp1 | Symbol::Kp2 => state.in_mf_bracket = true,
        Symbol::St => state.in_mf_bracket = false,
        _ => {}
    }
    Some(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOUD: f32 = 1000.0;

    fn powers_with(bins: &[usize], level: f32) -> PowerVector {
        let mut powers = [0.0f32; NUM_BINS];
        for &bin in bins {
            powers[bin] = level;
        }
        PowerVector(powers)
    }

    fn classify(bins: &[usize]) -> Symbol {
        ToneClassifier::default().classify(&powers_with(bins, LOUD), &mut ClassifierState::default())
    }

    #[test]
    fn test_below_floor_is_silence_regardless_of_pattern() {
        let classifier = ToneClassifier::default();
        let mut state = ClassifierState::default();
        for bins in [vec![4, 10], vec![B2400], vec![0, 1, 2, 3, 4, 5], vec![]] {
            let symbol = classifier.classify(&powers_with(&bins, 99.0), &mut state);
            assert_eq!(symbol, Symbol::Silence, "bins {:?}", bins);
        }
    }

    #[test]
    fn test_single_non_supervisory_bin_is_invalid() {
        for bin in 0..NUM_BINS {
            let expected = match bin {
                B2400 => Symbol::Tone2400,
                B2600 => Symbol::Tone2600,
                _ => Symbol::Invalid,
            };
            assert_eq!(classify(&[bin]), expected, "bin {}", bin);
        }
    }

    #[test]
    fn test_weak_bins_below_range_are_off() {
        // 5% of the peak is not "on"
        let mut powers = powers_with(&[DTMF_ROW_BINS[1], DTMF_COL_BINS[1]], LOUD);
        powers.0[X350] = LOUD * 0.05;
        powers.0[B2600] = LOUD * 0.09;
        let symbol = ToneClassifier::default().classify(&powers, &mut ClassifierState::default());
        assert_eq!(symbol, Symbol::Digit(5));
    }

    #[test]
    fn test_more_than_two_bins_is_invalid() {
        assert_eq!(
            classify(&[DTMF_ROW_BINS[0], DTMF_COL_BINS[0], DTMF_COL_BINS[1]]),
            Symbol::Invalid
        );
        assert_eq!(classify(&[X350, X440, X480]), Symbol::Invalid);
    }

    #[test]
    fn test_call_progress_pairs() {
        assert_eq!(classify(&[X350, X440]), Symbol::DialTone);
        assert_eq!(classify(&[X440, X480]), Symbol::Ring);
        assert_eq!(classify(&[X480, X620]), Symbol::Busy);
        assert_eq!(classify(&[X350, X620]), Symbol::Invalid);
    }

    #[test]
    fn test_supervisory_pair() {
        assert_eq!(classify(&[B2400, B2600]), Symbol::Tone2400And2600);
    }

    #[test]
    fn test_dtmf_keypad() {
        let keys = ["123A", "456B", "789C", "*0#D"];
        for (row, line) in keys.iter().enumerate() {
            for (col, key) in line.chars().enumerate() {
                let symbol = classify(&[DTMF_ROW_BINS[row], DTMF_COL_BINS[col]]);
                assert_eq!(symbol, Symbol::from_key(key).unwrap(), "row {} col {}", row, col);
            }
        }
    }

    #[test]
    fn test_mf_pairs() {
        let table = [
            (0, 1, Symbol::Digit(1)),
            (0, 2, Symbol::Digit(2)),
            (1, 2, Symbol::Digit(3)),
            (0, 3, Symbol::Digit(4)),
            (1, 3, Symbol::Digit(5)),
            (2, 3, Symbol::Digit(6)),
            (1, 4, Symbol::Digit(8)),
            (2, 4, Symbol::Digit(9)),
            (3, 4, Symbol::Digit(0)),
            (0, 5, Symbol::C11),
            (1, 5, Symbol::C12),
            (4, 5, Symbol::St),
        ];
        for (lower, upper, expected) in table {
            let symbol = classify(&[MF_BINS[lower], MF_BINS[upper]]);
            assert_eq!(symbol, expected, "MF pair ({}, {})", lower, upper);
        }
    }

    #[test]
    fn test_unassigned_mf_pairs_stay_invalid() {
        // 2400 with any lower MF tone, 2600 with anything but 2400
        for lower in 0..6 {
            assert_eq!(classify(&[MF_BINS[lower], B2400]), Symbol::Invalid);
            assert_eq!(classify(&[MF_BINS[lower], B2600]), Symbol::Invalid);
        }
    }

    #[test]
    fn test_kp_and_st_toggle_bracket() {
        let classifier = ToneClassifier::default();
        let mut state = ClassifierState::default();

        let kp1 = powers_with(&[MF_BINS[2], MF_BINS[5]], LOUD);
        assert_eq!(classifier.classify(&kp1, &mut state), Symbol::Kp1);
        assert!(state.in_mf_bracket);

        let st = powers_with(&[MF_BINS[4], MF_BINS[5]], LOUD);
        assert_eq!(classifier.classify(&st, &mut state), Symbol::St);
        assert!(!state.in_mf_bracket);

        let kp2 = powers_with(&[MF_BINS[3], MF_BINS[5]], LOUD);
        assert_eq!(classifier.classify(&kp2, &mut state), Symbol::Kp2);
        assert!(state.in_mf_bracket);
    }

    #[test]
    fn test_dtmf_three_versus_mf_seven() {
        let classifier = ToneClassifier::default();
        let overlap = powers_with(&[DTMF_ROW_BINS[0], DTMF_COL_BINS[2]], LOUD);

        let mut outside = ClassifierState::default();
        assert_eq!(classifier.classify(&overlap, &mut outside), Symbol::Digit(3));
        assert!(!outside.in_mf_bracket);

        let mut inside = ClassifierState { in_mf_bracket: true };
        assert_eq!(classifier.classify(&overlap, &mut inside), Symbol::Digit(7));
        assert!(inside.in_mf_bracket);
    }

    #[test]
    fn test_other_symbols_leave_state_alone() {
        let classifier = ToneClassifier::default();
        let mut state = ClassifierState { in_mf_bracket: true };
        for bins in [
            vec![X350, X440],
            vec![DTMF_ROW_BINS[2], DTMF_COL_BINS[1]],
            vec![MF_BINS[0], MF_BINS[1]],
            vec![B2600],
            vec![],
        ] {
            classifier.classify(&powers_with(&bins, LOUD), &mut state);
            assert!(state.in_mf_bracket, "bins {:?} changed the bracket", bins);
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = ToneClassifier::new(10.0, 0.5);
        let mut state = ClassifierState::default();
        let mut powers = powers_with(&[DTMF_ROW_BINS[3], DTMF_COL_BINS[0]], 20.0);
        assert_eq!(classifier.classify(&powers, &mut state), Symbol::Star);

        // 40% of peak no longer counts with a 0.5 range
        powers.0[DTMF_COL_BINS[0]] = 8.0;
        assert_eq!(classifier.classify(&powers, &mut state), Symbol::Invalid);
    }
}
