use std::f64::consts::TAU;

use super::TuningClient;

/// Frequency that sits at angle 0 on the pitch circle.
pub const REFERENCE_FREQUENCY: f64 = 440.0;

/// `2π · log2(freq / 440)`. One octave is one full turn. The result is not
/// reduced modulo 2π; the renderer's trigonometry takes care of that.
pub fn angle_for_frequency(freq: f64) -> f64 {
    TAU * (freq / REFERENCE_FREQUENCY).log2()
}

/// Note-to-angle lookup through a registered tuning client. Nothing is cached:
/// every call reflects the tuning loaded at that moment.
pub struct TuningResolver {
    client: TuningClient,
}

impl TuningResolver {
    pub fn new(client: TuningClient) -> Self {
        Self { client }
    }

    /// Frequency of `note`, or `None` if the tuning gave something that is not
    /// a positive finite number.
    pub fn frequency_of(&self, note: u8) -> Option<f64> {
        let freq = self.client.frequency_of(note)?;
        if freq.is_finite() && freq > 0.0 {
            Some(freq)
        } else {
            log::warn!(target: "tuning", "note {} resolved to unusable frequency {}", note, freq);
            None
        }
    }

    pub fn angle_of(&self, note: u8) -> Option<f64> {
        self.frequency_of(note).map(angle_for_frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::TuningHost;
    use chordagon_types::TuningParams;

    #[test]
    fn reference_is_angle_zero() {
        assert_eq!(angle_for_frequency(440.0), 0.0);
    }

    #[test]
    fn octave_is_one_turn_unreduced() {
        assert_eq!(angle_for_frequency(880.0), TAU);
        assert_eq!(angle_for_frequency(1760.0), 2.0 * TAU);
        assert_eq!(angle_for_frequency(220.0), -TAU);
    }

    #[test]
    fn angle_follows_resolved_frequency() {
        let host = TuningHost::with_source(TuningParams::default());
        let resolver = TuningResolver::new(host.register_client().unwrap());
        let freq = resolver.frequency_of(60).unwrap();
        assert_eq!(resolver.angle_of(60), Some(TAU * (freq / 440.0).log2()));
    }

    #[test]
    fn unusable_frequencies_are_rejected() {
        let host = TuningHost::with_source(|note: u8| if note == 0 { 0.0 } else { f64::NAN });
        let resolver = TuningResolver::new(host.register_client().unwrap());
        assert_eq!(resolver.angle_of(0), None);
        assert_eq!(resolver.angle_of(1), None);
    }
}
