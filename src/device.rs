//! MIDI output port discovery and connection
//!
//! The connection is opened once, off the event loop, and handed back as a
//! boxed [`PadSender`] through the app's event channel.

use std::io;
use std::thread::{self, JoinHandle};

use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};

use crate::app::AppEvent;

const CLIENT_NAME: &str = "scalepads";
const CONNECTION_NAME: &str = "scalepads-output";

/// Error type for MIDI connection and send operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("Failed to initialize MIDI output: {0}")]
    DriverInit(String),

    #[error("No MIDI output port found matching: {0}")]
    DeviceNotFound(String),

    #[error("Failed to open MIDI output port: {0}")]
    PortOpenFailure(String),

    #[error("Failed to send MIDI message: {0}")]
    SendFailure(String),
}

pub type ConnectionResult = Result<Box<dyn PadSender>, DeviceError>;

/// A note-on message addressed to one pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoteOn {
    pub channel:  u8,
    pub note:     u8,
    pub velocity: u8,
}

impl NoteOn {
    pub fn to_bytes(self) -> [u8; 3] {
        [0x90 | (self.channel & 0x0F), self.note & 0x7F, self.velocity & 0x7F]
    }
}

/// Capability to write messages to an open output port.
pub trait PadSender: Send {
    fn send(&mut self, message: NoteOn) -> Result<(), DeviceError>;

    /// Release the underlying port. Called once, at shutdown.
    fn close(self: Box<Self>) {}
}

/// Binding to a MIDI backend.
pub trait MidiDriver {
    type Port;

    fn output_port_names(&self) -> Vec<String>;

    fn find_output_port(&self, name: &str) -> Result<Self::Port, DeviceError>;

    fn open_sender(self, port: Self::Port) -> ConnectionResult;
}

/// Locate the port called `name` and open it.
pub fn open<D: MidiDriver>(driver: D, name: &str) -> ConnectionResult {
    let port = driver.find_output_port(name)?;
    driver.open_sender(port)
}

/// Pick the port for `wanted`: an exact name first, then a case-insensitive
/// substring match (ALSA appends client/port numbers to device names).
pub fn match_port_name<S: AsRef<str>>(names: &[S], wanted: &str) -> Option<usize> {
    if let Some(i) = names.iter().position(|n| n.as_ref() == wanted) {
        return Some(i);
    }
    let pattern = wanted.to_lowercase();
    names
        .iter()
        .position(|n| n.as_ref().to_lowercase().contains(&pattern))
}

/// Run `connect` on its own thread and post the outcome as [`AppEvent::Connected`].
pub fn spawn_connect<F>(connect: F, events: flume::Sender<AppEvent>) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() -> ConnectionResult + Send + 'static,
{
    thread::Builder::new()
        .name("midi-connect".to_string())
        .spawn(move || {
            let result = connect();
            match &result {
                Ok(_) => log::info!("MIDI: Connected to output port"),
                Err(e) => log::warn!("MIDI: {}", e),
            }
            if events.send(AppEvent::Connected(result)).is_err() {
                log::debug!("MIDI: Event loop closed before connection finished");
            }
        })
}

// ── midir backend ─────────────────────────────────────────────────────────────

pub struct MidirDriver {
    output: MidiOutput,
}

impl MidirDriver {
    pub fn new() -> Result<Self, DeviceError> {
        let output = MidiOutput::new(CLIENT_NAME)
            .map_err(|e| DeviceError::DriverInit(e.to_string()))?;
        Ok(Self { output })
    }
}

impl MidiDriver for MidirDriver {
    type Port = MidiOutputPort;

    fn output_port_names(&self) -> Vec<String> {
        self.output
            .ports()
            .iter()
            .filter_map(|port| self.output.port_name(port).ok())
            .collect()
    }

    fn find_output_port(&self, name: &str) -> Result<MidiOutputPort, DeviceError> {
        let ports = self.output.ports();
        let names: Vec<String> = ports
            .iter()
            .map(|port| self.output.port_name(port).unwrap_or_default())
            .collect();

        let index = match_port_name(&names, name)
            .ok_or_else(|| DeviceError::DeviceNotFound(name.to_string()))?;

        log::info!("MIDI: Found output port: {}", names[index]);
        Ok(ports[index].clone())
    }

    fn open_sender(self, port: MidiOutputPort) -> ConnectionResult {
        let connection = self
            .output
            .connect(&port, CONNECTION_NAME)
            .map_err(|e| DeviceError::PortOpenFailure(e.to_string()))?;
        Ok(Box::new(MidirSender { connection }))
    }
}

struct MidirSender {
    connection: MidiOutputConnection,
}

impl PadSender for MidirSender {
    fn send(&mut self, message: NoteOn) -> Result<(), DeviceError> {
        log::debug!(
            "[MIDI OUT] Note ch={} note={} val={}",
            message.channel, message.note, message.velocity
        );
        self.connection
            .send(&message.to_bytes())
            .map_err(|e| DeviceError::SendFailure(e.to_string()))
    }

    fn close(self: Box<Self>) {
        let _output = self.connection.close();
        log::info!("MIDI: Output port closed");
    }
}
