use std::path::{Path, PathBuf};

use serde::Deserialize;

use chordagon_types::{JIFlavor, Key, TuningParams, TuningSystem};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

pub const MIN_QUEUE_CAPACITY: usize = 16;
pub const MAX_QUEUE_CAPACITY: usize = 65_536;

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    tuning: TuningConfig,
    #[serde(default)]
    midi: MidiConfig,
    #[serde(default)]
    runtime: RuntimeConfig,
}

#[derive(Deserialize, Default)]
struct TuningConfig {
    system: Option<String>,
    tuning_a4: Option<f64>,
    edo_divisions: Option<u16>,
    key: Option<String>,
    ji_flavor: Option<String>,
}

#[derive(Deserialize, Default)]
struct MidiConfig {
    client_name: Option<String>,
    queue_capacity: Option<usize>,
    port_filter: Option<Vec<String>>,
}

#[derive(Deserialize, Default)]
struct RuntimeConfig {
    frame_rate: Option<u32>,
}

pub struct Config {
    tuning: TuningConfig,
    midi: MidiConfig,
    runtime: RuntimeConfig,
}

impl Config {
    /// Embedded defaults merged with `~/.config/chordagon/config.toml`, if present.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref())
    }

    /// Embedded defaults merged with the file at `path`. A missing, unreadable
    /// or malformed file is logged and ignored.
    pub fn load_from(path: Option<&Path>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(path) = path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_tuning(&mut base.tuning, user.tuning);
                            merge_midi(&mut base.midi, user.midi);
                            merge_runtime(&mut base.runtime, user.runtime);
                            log::info!(target: "config", "loaded {}", path.display());
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            } else {
                log::debug!(target: "config", "no config at {}, using defaults", path.display());
            }
        }

        Config {
            tuning: base.tuning,
            midi: base.midi,
            runtime: base.runtime,
        }
    }

    /// Tuning parameters for the startup tuning source. Unknown names fall back
    /// to the defaults.
    pub fn tuning(&self) -> TuningParams {
        let fallback = TuningParams::default();
        let system = match self.tuning.system.as_deref().and_then(parse_tuning_system) {
            Some(TuningSystem::Edo(_)) => {
                TuningSystem::Edo(self.tuning.edo_divisions.unwrap_or(12).clamp(1, 1200))
            }
            Some(system) => system,
            None => fallback.system,
        };
        let tuning_a4 = self
            .tuning
            .tuning_a4
            .filter(|f| f.is_finite() && *f > 0.0)
            .unwrap_or(fallback.tuning_a4);
        let key = self
            .tuning
            .key
            .as_deref()
            .and_then(parse_key)
            .unwrap_or(fallback.key);
        let ji_flavor = self
            .tuning
            .ji_flavor
            .as_deref()
            .and_then(parse_ji_flavor)
            .unwrap_or(fallback.ji_flavor);
        TuningParams::new(system, tuning_a4).with_key(key, ji_flavor)
    }

    /// Name this process registers with the MIDI driver.
    pub fn midi_client_name(&self) -> &str {
        self.midi.client_name.as_deref().unwrap_or("chordagon")
    }

    /// Event queue capacity (clamped to 16..65536).
    pub fn queue_capacity(&self) -> usize {
        self.midi
            .queue_capacity
            .unwrap_or(128)
            .clamp(MIN_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY)
    }

    pub fn port_filter(&self) -> &[String] {
        self.midi.port_filter.as_deref().unwrap_or(&[])
    }

    /// Frames per second of the consumer loop (clamped to 1..240).
    pub fn frame_rate(&self) -> u32 {
        self.runtime.frame_rate.unwrap_or(60).clamp(1, 240)
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chordagon").join("config.toml"))
}

fn merge_tuning(base: &mut TuningConfig, user: TuningConfig) {
    if user.system.is_some() {
        base.system = user.system;
    }
    if user.tuning_a4.is_some() {
        base.tuning_a4 = user.tuning_a4;
    }
    if user.edo_divisions.is_some() {
        base.edo_divisions = user.edo_divisions;
    }
    if user.key.is_some() {
        base.key = user.key;
    }
    if user.ji_flavor.is_some() {
        base.ji_flavor = user.ji_flavor;
    }
}

fn merge_midi(base: &mut MidiConfig, user: MidiConfig) {
    if user.client_name.is_some() {
        base.client_name = user.client_name;
    }
    if user.queue_capacity.is_some() {
        base.queue_capacity = user.queue_capacity;
    }
    if user.port_filter.is_some() {
        base.port_filter = user.port_filter;
    }
}

fn merge_runtime(base: &mut RuntimeConfig, user: RuntimeConfig) {
    if user.frame_rate.is_some() {
        base.frame_rate = user.frame_rate;
    }
}

fn parse_key(s: &str) -> Option<Key> {
    match s {
        "C" => Some(Key::C),
        "C#" | "Cs" => Some(Key::Cs),
        "D" => Some(Key::D),
        "D#" | "Ds" => Some(Key::Ds),
        "E" => Some(Key::E),
        "F" => Some(Key::F),
        "F#" | "Fs" => Some(Key::Fs),
        "G" => Some(Key::G),
        "G#" | "Gs" => Some(Key::Gs),
        "A" => Some(Key::A),
        "A#" | "As" => Some(Key::As),
        "B" => Some(Key::B),
        _ => None,
    }
}

/// `Edo` comes back with a placeholder division count; the caller fills it in.
fn parse_tuning_system(s: &str) -> Option<TuningSystem> {
    match s {
        "EqualTemperament" | "ET" | "12-TET" => Some(TuningSystem::EqualTemperament),
        "Edo" | "EDO" => Some(TuningSystem::Edo(12)),
        "ScaleJI" => Some(TuningSystem::ScaleJI),
        _ => None,
    }
}

fn parse_ji_flavor(s: &str) -> Option<JIFlavor> {
    match s {
        "FiveLimit" | "5-Limit" | "5L" => Some(JIFlavor::FiveLimit),
        "SevenLimit" | "7-Limit" | "7L" => Some(JIFlavor::SevenLimit),
        "Pythagorean" => Some(JIFlavor::Pythagorean),
        _ => None,
    }
}
