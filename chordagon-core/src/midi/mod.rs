//! Hardware MIDI input.
//!
//! Opens one `midir` connection per input port. Each connection's driver
//! callback parses note messages and pushes them into its own [`NoteSender`],
//! so several ports feed the shared queue concurrently.

use std::fmt;

use midir::{Ignore, MidiInput, MidiInputConnection};

use chordagon_types::{NoteEvent, NoteEventKind};

use crate::queue::NoteSender;

/// Error opening the MIDI subsystem or a port.
#[derive(Debug, Clone)]
pub enum MidiError {
    Init(String),
    InvalidPort(usize),
    Connect { port: String, reason: String },
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(reason) => write!(f, "MIDI init failed: {}", reason),
            Self::InvalidPort(index) => write!(f, "Invalid port index: {}", index),
            Self::Connect { port, reason } => write!(f, "could not connect to {}: {}", port, reason),
        }
    }
}

impl std::error::Error for MidiError {}

impl From<midir::InitError> for MidiError {
    fn from(e: midir::InitError) -> Self {
        Self::Init(e.to_string())
    }
}

/// Information about an available MIDI port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

impl MidiPortInfo {
    /// An empty filter matches every port; otherwise any substring must match.
    pub fn matches(&self, filter: &[String]) -> bool {
        filter.is_empty() || filter.iter().any(|f| self.name.contains(f.as_str()))
    }
}

struct PortConnection {
    name: String,
    connection: MidiInputConnection<()>,
}

/// Owns every open input connection. Dropping it closes them all.
pub struct MidiInputManager {
    client_name: String,
    connections: Vec<PortConnection>,
    available_ports: Vec<MidiPortInfo>,
}

impl MidiInputManager {
    pub fn new(client_name: &str) -> Self {
        Self {
            client_name: client_name.to_string(),
            connections: Vec::new(),
            available_ports: Vec::new(),
        }
    }

    /// Refresh the list of available MIDI input ports
    pub fn refresh_ports(&mut self) -> Result<(), MidiError> {
        self.available_ports.clear();
        let midi_in = MidiInput::new(&self.client_name)?;
        for (index, port) in midi_in.ports().iter().enumerate() {
            if let Ok(name) = midi_in.port_name(port) {
                self.available_ports.push(MidiPortInfo { index, name });
            }
        }
        Ok(())
    }

    pub fn list_ports(&self) -> &[MidiPortInfo] {
        &self.available_ports
    }

    pub fn connected_port_names(&self) -> impl Iterator<Item = &str> {
        self.connections.iter().map(|c| c.name.as_str())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Connect to one input port by index; its events go to `sender`.
    pub fn connect(&mut self, port_index: usize, sender: NoteSender) -> Result<(), MidiError> {
        // connect() consumes the MidiInput, so every port gets its own
        let mut midi_in = MidiInput::new(&self.client_name)?;
        midi_in.ignore(Ignore::All);
        let ports = midi_in.ports();
        let port = ports.get(port_index).ok_or(MidiError::InvalidPort(port_index))?;
        let port_name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let connection = midi_in
            .connect(
                port,
                &format!("{}-in-{}", self.client_name, port_index),
                move |timestamp, message, _| {
                    if let Some(event) = parse_note_message(message, timestamp) {
                        sender.send(event);
                    }
                },
                (),
            )
            .map_err(|e| MidiError::Connect {
                port: port_name.clone(),
                reason: e.to_string(),
            })?;

        log::info!(target: "midi", "listening on {}: {}", port_index, port_name);
        self.connections.push(PortConnection {
            name: port_name,
            connection,
        });
        Ok(())
    }

    /// Connect every known port matching `filter`. Ports that fail to open are
    /// logged and skipped. Returns how many connected.
    pub fn connect_all(&mut self, filter: &[String], sender: &NoteSender) -> usize {
        let targets: Vec<MidiPortInfo> = self
            .available_ports
            .iter()
            .filter(|p| p.matches(filter))
            .cloned()
            .collect();

        let mut connected = 0;
        for port in targets {
            match self.connect(port.index, sender.clone()) {
                Ok(()) => connected += 1,
                Err(e) => log::warn!(target: "midi", "skipping port {}: {}", port.name, e),
            }
        }
        connected
    }

    pub fn disconnect_all(&mut self) {
        for port in self.connections.drain(..) {
            log::debug!(target: "midi", "closing {}", port.name);
            port.connection.close();
        }
    }
}

impl Drop for MidiInputManager {
    fn drop(&mut self) {
        self.disconnect_all();
    }
}

/// Parse raw MIDI bytes into a note event. Everything other than note-on and
/// note-off is ignored. Velocity-0 note-ons are passed through unchanged.
pub fn parse_note_message(data: &[u8], timestamp_us: u64) -> Option<NoteEvent> {
    let (&status, rest) = data.split_first()?;
    let kind = match status & 0xF0 {
        0x80 => NoteEventKind::NoteOff,
        0x90 => NoteEventKind::NoteOn,
        _ => return None,
    };
    let &[note, velocity, ..] = rest else {
        return None;
    };
    // data bytes must have the high bit clear
    if note > 0x7F || velocity > 0x7F {
        return None;
    }
    Some(NoteEvent {
        kind,
        note,
        velocity,
        channel: status & 0x0F,
        timestamp_us,
    })
}
