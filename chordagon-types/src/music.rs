use serde::{Deserialize, Serialize};

/// Tonic pitch class used by the just-intonation tunings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Key {
    C = 0,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl Key {
    pub const ALL: [Key; 12] = [
        Key::C,
        Key::Cs,
        Key::D,
        Key::Ds,
        Key::E,
        Key::F,
        Key::Fs,
        Key::G,
        Key::Gs,
        Key::A,
        Key::As,
        Key::B,
    ];

    const NAMES: [&'static str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];

    pub fn name(&self) -> &'static str {
        Self::NAMES[*self as usize]
    }

    /// Pitch class of the key, i.e. its MIDI note number in octave -1.
    pub fn semitone(&self) -> i32 {
        *self as i32
    }
}

impl Default for Key {
    fn default() -> Self {
        Key::C
    }
}

/// Ratio table used by [`TuningSystem::ScaleJI`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JIFlavor {
    /// Classic 5-limit: 6/5 minor third, 9/5 minor seventh
    FiveLimit,
    /// Septimal: 7/6 minor third, 7/4 minor seventh
    SevenLimit,
    /// Stacked pure fifths
    Pythagorean,
}

impl JIFlavor {
    pub const ALL: [JIFlavor; 3] = [
        JIFlavor::FiveLimit,
        JIFlavor::SevenLimit,
        JIFlavor::Pythagorean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JIFlavor::FiveLimit => "5-Limit",
            JIFlavor::SevenLimit => "7-Limit",
            JIFlavor::Pythagorean => "Pythagorean",
        }
    }
}

impl Default for JIFlavor {
    fn default() -> Self {
        JIFlavor::FiveLimit
    }
}

/// How MIDI note numbers map to frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TuningSystem {
    /// Standard 12-tone equal temperament
    EqualTemperament,
    /// Equal division of the octave into `n` steps, one step per MIDI note
    Edo(u16),
    /// Just intonation ratios relative to the key's tonic
    ScaleJI,
}

impl TuningSystem {
    pub fn name(&self) -> String {
        match self {
            TuningSystem::EqualTemperament => "12-TET".to_string(),
            TuningSystem::Edo(n) => format!("{}-EDO", n),
            TuningSystem::ScaleJI => "Scale JI".to_string(),
        }
    }
}

impl Default for TuningSystem {
    fn default() -> Self {
        TuningSystem::EqualTemperament
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn key_semitones_0_to_11() {
        let semitones: Vec<i32> = Key::ALL.iter().map(|k| k.semitone()).collect();
        assert_eq!(semitones, (0..12).collect::<Vec<i32>>());
    }

    #[test]
    fn key_names_unique() {
        let names: HashSet<&str> = Key::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), 12);
        assert_eq!(Key::Fs.name(), "F#");
    }

    #[test]
    fn tuning_system_names() {
        assert_eq!(TuningSystem::EqualTemperament.name(), "12-TET");
        assert_eq!(TuningSystem::Edo(31).name(), "31-EDO");
        assert_eq!(TuningSystem::default(), TuningSystem::EqualTemperament);
    }
}
