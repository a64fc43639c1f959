//! Core Types für die Dimmer-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::net::Ipv4Addr;

/// Minimale Helligkeit in Prozent (WiZ akzeptiert 10-100)
pub const MIN_BRIGHTNESS: u8 = 10;

/// Maximale Helligkeit in Prozent
pub const MAX_BRIGHTNESS: u8 = 100;

/// Helligkeits-Änderung pro Encoder-Rastung (2% = feinere Steuerung)
pub const BRIGHTNESS_STEP: u8 = 2;

/// Helligkeit nach dem Start
pub const DEFAULT_BRIGHTNESS: u8 = 50;

/// UDP-Port auf dem WiZ-Lampen Kommandos annehmen
pub const WIZ_PORT: u16 = 38899;

/// Eine entfernte Lampe (WiZ Endpoint)
///
/// Adressen kommen aus der Konfiguration, es gibt keine Discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Anzeigename für Logs (z.B. "study")
    pub name: &'static str,
    pub ip: Ipv4Addr,
    pub port: u16,
}

impl Endpoint {
    /// Endpoint auf dem Standard-WiZ-Port
    pub const fn new(name: &'static str, ip: Ipv4Addr) -> Self {
        Self {
            name,
            ip,
            port: WIZ_PORT,
        }
    }
}

/// Farbtemperaturen in der Reihenfolge in der der Encoder-Klick sie durchläuft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTemperature {
    Candlelight,
    WarmWhite,
    Neutral,
    Daylight,
}

impl ColorTemperature {
    /// Alle Stufen, Index = `LightingState::color_temp_index`
    pub const CYCLE: [ColorTemperature; 4] = [
        ColorTemperature::Candlelight,
        ColorTemperature::WarmWhite,
        ColorTemperature::Neutral,
        ColorTemperature::Daylight,
    ];

    pub const fn kelvin(self) -> u16 {
        match self {
            ColorTemperature::Candlelight => 2200,
            ColorTemperature::WarmWhite => 2700,
            ColorTemperature::Neutral => 4000,
            ColorTemperature::Daylight => 6500,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ColorTemperature::Candlelight => "candlelight",
            ColorTemperature::WarmWhite => "warm white",
            ColorTemperature::Neutral => "neutral",
            ColorTemperature::Daylight => "daylight",
        }
    }

    /// Stufe für einen (beliebigen) Index, zyklisch
    pub const fn from_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }
}

/// Lichtzustand des Controllers (Single Source of Truth)
///
/// Wird beim Start mit festen Defaults erzeugt und nur vom Dispatcher verändert.
/// Nichts davon wird gespeichert, ein Reset startet wieder bei den Defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightingState<const N: usize> {
    /// Helligkeit in Prozent, immer Vielfaches von BRIGHTNESS_STEP in [MIN, MAX]
    pub brightness: u8,
    /// Ein/Aus pro Endpoint (Reihenfolge = Priorität beim Senden)
    pub power: [bool; N],
    /// Position im Farbtemperatur-Zyklus (0..4)
    pub color_temp_index: usize,
}

impl<const N: usize> LightingState<N> {
    pub const fn new() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            power: [false; N],
            color_temp_index: 0,
        }
    }

    pub fn any_on(&self) -> bool {
        self.power.iter().any(|on| *on)
    }

    /// Aktuelle Farbtemperatur-Stufe
    pub fn color_temperature(&self) -> ColorTemperature {
        ColorTemperature::from_index(self.color_temp_index)
    }
}

impl<const N: usize> Default for LightingState<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Physisches Bedienelement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Taster im Drehencoder
    Encoder,
    /// Ein/Aus-Taster für den Endpoint mit diesem Index
    Lamp(usize),
}

/// Aufgelöste Taster-Geste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Click,
    DoubleClick,
    LongPress,
}

/// Verbindungsstatus für das periodische [WIFI] Log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Kein Link zum Access Point
    Disconnected,
    /// Link da, aber noch keine IP vom DHCP
    LinkUp,
    Connected(Ipv4Addr),
}

impl LinkStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, LinkStatus::Connected(_))
    }
}

/// Heap-Statistik für das periodische [HEAP] Log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapStats {
    pub free: usize,
    pub used: usize,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Endpoint {
    fn format(&self, fmt: defmt::Formatter) {
        let [a, b, c, d] = self.ip.octets();
        defmt::write!(
            fmt,
            "{} ({}.{}.{}.{}:{})",
            self.name,
            a,
            b,
            c,
            d,
            self.port
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ColorTemperature {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}K ({})", self.kelvin(), self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Control {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Control::Encoder => defmt::write!(fmt, "Encoder"),
            Control::Lamp(index) => defmt::write!(fmt, "Lamp({})", index),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ButtonEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ButtonEvent::Click => defmt::write!(fmt, "Click"),
            ButtonEvent::DoubleClick => defmt::write!(fmt, "DoubleClick"),
            ButtonEvent::LongPress => defmt::write!(fmt, "LongPress"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LinkStatus {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LinkStatus::Disconnected => defmt::write!(fmt, "disconnected"),
            LinkStatus::LinkUp => defmt::write!(fmt, "link up, waiting for IP"),
            LinkStatus::Connected(ip) => {
                let [a, b, c, d] = ip.octets();
                defmt::write!(fmt, "connected ({}.{}.{}.{})", a, b, c, d)
            }
        }
    }
}
