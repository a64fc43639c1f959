//! WiZ UDP-Protokoll
//!
//! Jedes Kommando ist ein kompaktes JSON-Objekt in einem einzelnen Datagramm:
//!
//! ```text
//! {"id":7,"method":"setPilot","params":{"state":true,"dimming":66}}
//! {"id":8,"method":"setPilot","params":{"state":false}}
//! {"id":9,"method":"setPilot","params":{"dimming":66,"temp":2700}}
//! ```
//!
//! Es gibt keine Bestätigung und kein Retry (fire-and-forget). Antworten der
//! Lampen werden nur gelesen damit der Empfangspuffer nicht vollläuft.

use serde::Serialize;

use crate::traits::{DatagramTransport, TransportError};
use crate::types::Endpoint;

/// Maximale Größe eines Kommandos in Bytes (fester Stack-Buffer, kein Heap)
pub const COMMAND_BUFFER_SIZE: usize = 128;

/// WiZ Methode für Zustands-Änderungen
pub const METHOD_SET_PILOT: &str = "setPilot";

/// Parameter von `setPilot`
///
/// Nicht gesetzte Felder werden nicht serialisiert. Ein Farbtemperatur-Kommando
/// hat absichtlich kein `state`, damit ausgeschaltete Lampen aus bleiben.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PilotParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimming: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<u16>,
}

impl PilotParams {
    /// Ein mit Helligkeit oder Aus (ohne Helligkeit)
    pub fn power(on: bool, brightness: u8) -> Self {
        Self {
            state: Some(on),
            dimming: on.then_some(brightness),
            temp: None,
        }
    }

    /// Helligkeit + Farbtemperatur, ohne `state`
    pub fn color_temp(brightness: u8, kelvin: u16) -> Self {
        Self {
            state: None,
            dimming: Some(brightness),
            temp: Some(kelvin),
        }
    }
}

/// Ein komplettes `setPilot` Kommando
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PilotCommand {
    pub id: u32,
    pub method: &'static str,
    pub params: PilotParams,
}

impl PilotCommand {
    pub fn new(id: u32, params: PilotParams) -> Self {
        Self {
            id,
            method: METHOD_SET_PILOT,
            params,
        }
    }

    /// Serialisiert in den Buffer, gibt die Länge zurück
    pub fn encode(&self, buffer: &mut [u8; COMMAND_BUFFER_SIZE]) -> Result<usize, CommandError> {
        serde_json_core::to_slice(self, buffer).map_err(|_| CommandError::Encode)
    }
}

/// Fehler beim Senden eines Kommandos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// JSON passt nicht in COMMAND_BUFFER_SIZE
    Encode,
    Transport(TransportError),
}

impl From<TransportError> for CommandError {
    fn from(e: TransportError) -> Self {
        CommandError::Transport(e)
    }
}

/// Baut Kommandos und schickt sie über den Transport
///
/// Hält die Request-ID. Sie startet bei 1 und wird nur weitergezählt wenn der
/// Transport das Datagramm angenommen hat, die angenommenen IDs sind also
/// lückenlos aufsteigend.
pub struct CommandSender<T: DatagramTransport> {
    transport: T,
    next_id: u32,
}

impl<T: DatagramTransport> CommandSender<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            next_id: 1,
        }
    }

    /// ID die das nächste Kommando bekommt
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Schaltet eine Lampe ein (mit Helligkeit) oder aus
    pub fn send_power(
        &mut self,
        endpoint: &Endpoint,
        on: bool,
        brightness: u8,
    ) -> Result<u32, CommandError> {
        self.send(endpoint, PilotParams::power(on, brightness))
    }

    /// Setzt Helligkeit und Farbtemperatur ohne den Ein/Aus-Zustand zu berühren
    pub fn send_color_temp(
        &mut self,
        endpoint: &Endpoint,
        brightness: u8,
        kelvin: u16,
    ) -> Result<u32, CommandError> {
        self.send(endpoint, PilotParams::color_temp(brightness, kelvin))
    }

    fn send(&mut self, endpoint: &Endpoint, params: PilotParams) -> Result<u32, CommandError> {
        let command = PilotCommand::new(self.next_id, params);

        let mut buffer = [0u8; COMMAND_BUFFER_SIZE];
        let len = command.encode(&mut buffer).inspect_err(|_| {
            error!("Command for {} does not fit into buffer", endpoint);
        })?;
        let payload = &buffer[..len];

        if let Err(e) = self.transport.send_to(endpoint, payload) {
            error!("UDP send failed to {}: {}", endpoint, e);
            return Err(e.into());
        }

        let json = core::str::from_utf8(payload).unwrap_or("<invalid utf-8>");
        info!("Sent to {} [ID:{}]: {}", endpoint, command.id, json);

        self.next_id = self.next_id.wrapping_add(1);
        Ok(command.id)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TransportError::NoRoute => defmt::write!(fmt, "no route"),
            TransportError::BufferFull => defmt::write!(fmt, "send buffer full"),
            TransportError::SendFailed => defmt::write!(fmt, "send failed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CommandError::Encode => defmt::write!(fmt, "encode failed"),
            CommandError::Transport(e) => defmt::write!(fmt, "transport: {}", e),
        }
    }
}
