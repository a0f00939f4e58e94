use std::fmt;
use std::sync::Arc;

use chordagon_core::config::Config;
use chordagon_core::midi::{MidiError, MidiInputManager};
use chordagon_core::pipeline::NotePipeline;
use chordagon_core::tuning::{TuningError, TuningHost};

/// Anything that stops the visualizer from starting.
#[derive(Debug)]
pub enum StartupError {
    Tuning(TuningError),
    Midi(MidiError),
}

impl From<TuningError> for StartupError {
    fn from(e: TuningError) -> Self {
        Self::Tuning(e)
    }
}

impl From<MidiError> for StartupError {
    fn from(e: MidiError) -> Self {
        Self::Midi(e)
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tuning(e) => write!(f, "tuning error: {}", e),
            Self::Midi(e) => write!(f, "MIDI error: {}", e),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tuning(e) => Some(e),
            Self::Midi(e) => Some(e),
        }
    }
}

/// Load the configured tuning and build the pipeline around it.
pub fn build_pipeline(config: &Config) -> Result<(Arc<TuningHost>, NotePipeline), StartupError> {
    let tuning = TuningHost::with_source(config.tuning());
    let pipeline = NotePipeline::from_config(config, &tuning)?;
    Ok((tuning, pipeline))
}

/// Open every input port allowed by the config, all feeding `pipeline`.
/// Zero ports is not an error; the display just stays empty.
pub fn connect_inputs(config: &Config, pipeline: &NotePipeline) -> Result<MidiInputManager, StartupError> {
    let mut midi = MidiInputManager::new(config.midi_client_name());
    midi.refresh_ports()?;

    midi.connect_all(config.port_filter(), &pipeline.sender());
    if midi.connection_count() == 0 {
        log::warn!(
            target: "midi",
            "no MIDI inputs connected ({} ports available)",
            midi.list_ports().len()
        );
    } else {
        let names: Vec<&str> = midi.connected_port_names().collect();
        log::info!(target: "midi", "listening on {}", names.join(", "));
    }
    Ok(midi)
}

/// Print available input ports, marking those the filter would connect.
pub fn print_ports(config: &Config) -> Result<(), StartupError> {
    let mut midi = MidiInputManager::new(config.midi_client_name());
    midi.refresh_ports()?;
    println!("MIDI input ports:");
    for port in midi.list_ports() {
        let mark = if port.matches(config.port_filter()) { "*" } else { " " };
        println!("{} {}: {}", mark, port.index, port.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_registers_one_tuning_client() {
        let config = Config::load_from(None);
        let (tuning, pipeline) = build_pipeline(&config).unwrap();
        assert_eq!(tuning.client_count(), 1);
        drop(pipeline);
        assert_eq!(tuning.client_count(), 0);
    }

    #[test]
    fn startup_error_keeps_its_cause() {
        use std::error::Error;

        let err = StartupError::from(TuningError::NoTuningLoaded);
        let cause = err.source().expect("tuning cause");
        assert_eq!(
            cause.downcast_ref::<TuningError>(),
            Some(&TuningError::NoTuningLoaded)
        );

        let err = StartupError::from(MidiError::InvalidPort(3));
        let cause = err.source().expect("MIDI cause");
        assert!(matches!(
            cause.downcast_ref::<MidiError>(),
            Some(MidiError::InvalidPort(3))
        ));
    }

    #[test]
    fn startup_error_display() {
        let err = StartupError::from(TuningError::NoTuningLoaded);
        assert!(err.to_string().starts_with("tuning error:"));
        let err = StartupError::from(MidiError::InvalidPort(3));
        assert_eq!(err.to_string(), "MIDI error: Invalid port index: 3");
    }
}
