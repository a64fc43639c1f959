// Library-Root: Hardware-Anbindung und Tasks der Dimmer-Firmware
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

use esp_core::ControlLoop;

use crate::config::{BUTTON_COUNT, LAMP_COUNT};
use crate::hal::{GpioButton, NetworkMonitor, PcntEncoder, TimerWatchdog, UdpTransport};

// ============================================================================
// Type-Aliase
// ============================================================================
//
// Statt:  ControlLoop<PcntEncoder, GpioButton, UdpTransport, NetworkMonitor, TimerWatchdog, 2, 3>
// Nutze:  DimmerLoop

/// Die komplette Steuerung mit echter Hardware
/// - LAMP_COUNT: Anzahl der WiZ-Lampen
/// - BUTTON_COUNT: Encoder-Taster + ein Taster pro Lampe
pub type DimmerLoop = ControlLoop<
    PcntEncoder,
    GpioButton,
    UdpTransport,
    NetworkMonitor,
    TimerWatchdog,
    LAMP_COUNT,
    BUTTON_COUNT,
>;
