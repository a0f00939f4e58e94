//! Pitch-to-frequency conversion for the supported tuning systems.
//!
//! Pure functions only. Anything that can change at runtime (which tuning is
//! loaded, who is reading it) lives in `chordagon-core`.

pub mod ratios;

use crate::music::{JIFlavor, Key, TuningSystem};

/// MIDI note number of A4.
pub const A4_NOTE: u8 = 69;

/// Everything needed to resolve a MIDI note to a frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningParams {
    pub system: TuningSystem,
    /// Frequency of MIDI note 69 in Hz
    pub tuning_a4: f64,
    /// Tonic for just intonation
    pub key: Key,
    pub ji_flavor: JIFlavor,
}

impl Default for TuningParams {
    fn default() -> Self {
        Self {
            system: TuningSystem::EqualTemperament,
            tuning_a4: 440.0,
            key: Key::C,
            ji_flavor: JIFlavor::FiveLimit,
        }
    }
}

impl TuningParams {
    pub fn new(system: TuningSystem, tuning_a4: f64) -> Self {
        Self {
            system,
            tuning_a4,
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: Key, ji_flavor: JIFlavor) -> Self {
        self.key = key;
        self.ji_flavor = ji_flavor;
        self
    }

    /// Frequency in Hz of `pitch` under these parameters.
    pub fn frequency_of(&self, pitch: u8) -> f64 {
        match self.system {
            TuningSystem::EqualTemperament => et_freq(pitch, self.tuning_a4),
            TuningSystem::Edo(divisions) => edo_freq(pitch, self.tuning_a4, divisions),
            TuningSystem::ScaleJI => scale_ji_freq(pitch, self.tuning_a4, self.key, self.ji_flavor),
        }
    }
}

/// Standard 12-TET formula
pub fn et_freq(pitch: u8, tuning_a4: f64) -> f64 {
    edo_freq(pitch, tuning_a4, 12)
}

/// `divisions`-EDO anchored at A4; one MIDI step is one EDO step.
pub fn edo_freq(pitch: u8, tuning_a4: f64, divisions: u16) -> f64 {
    let steps = pitch as f64 - A4_NOTE as f64;
    tuning_a4 * 2.0_f64.powf(steps / divisions.max(1) as f64)
}

/// Ratio lookup relative to the tonic. The tonic itself sits on its 12-TET
/// frequency so that switching systems keeps the key centre in place.
pub fn scale_ji_freq(pitch: u8, tuning_a4: f64, key: Key, flavor: JIFlavor) -> f64 {
    let table = ratios::scale_ratios(flavor);
    let from_tonic = pitch as i32 - key.semitone();
    let degree = from_tonic.rem_euclid(12) as usize;
    let octave = from_tonic.div_euclid(12);

    let tonic_freq = tuning_a4 * 2.0_f64.powf((key.semitone() - A4_NOTE as i32) as f64 / 12.0);
    tonic_freq * 2.0_f64.powi(octave) * table[degree]
}
