//! ESP Core - Platform-agnostic Control Loop, Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Encoder, Taster, UDP und Watchdog kommen über Traits rein,
//! dadurch läuft die komplette Steuerung auch in Host-Tests.

#![no_std]

#[macro_use]
mod fmt;

pub mod button;
pub mod dispatcher;
pub mod logic;
pub mod protocol;
pub mod rotation;
pub mod supervisor;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use button::{ButtonConfig, ButtonDetector};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use logic::{MAX_DETENTS, MIN_DETENTS, clamp_detents, detents_to_brightness};
pub use protocol::{CommandError, CommandSender, PilotCommand, PilotParams};
pub use rotation::QuantizedRotation;
pub use supervisor::{ControlInput, ControlLoop, IntervalTimer, LoopConfig, TickReport};
pub use traits::{
    ButtonPin, DatagramTransport, RotationCounter, SystemMonitor, TransportError, Watchdog,
};
pub use types::{
    BRIGHTNESS_STEP, ButtonEvent, ColorTemperature, Control, DEFAULT_BRIGHTNESS, Endpoint,
    HeapStats, LightingState, LinkStatus, MAX_BRIGHTNESS, MIN_BRIGHTNESS, WIZ_PORT,
};
