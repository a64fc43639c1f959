//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.
//!
//! # Implementierungen
//! - **Production:** esp-firmware `hal` Modul (PCNT, GPIO, embassy-net, TIMG)
//! - **Testing:** Mocks in esp-tests (in-memory)

use crate::types::{Endpoint, HeapStats, LinkStatus};

/// Fehler-Typ für UDP-Sendeoperationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Keine Route zum Ziel (z.B. WiFi getrennt)
    NoRoute,
    /// Sendepuffer voll, Datagramm wurde nicht angenommen
    BufferFull,
    SendFailed,
}

/// Zähler des Drehencoders
///
/// Der Wert wird asynchron von der Hardware (Interrupt/PCNT) verändert und
/// kann den gültigen Bereich kurzzeitig verlassen. Zwischen `count()` und
/// `set_count()` darf sich der Wert ändern.
pub trait RotationCounter {
    /// Aktueller (ungeklemmter) Stand in Rastungen
    fn count(&mut self) -> i32;

    /// Setzt den Stand (zum Klemmen an den Bereichsgrenzen)
    fn set_count(&mut self, detents: i32);
}

/// Digitaler Eingang eines Tasters (roh, ungefiltert)
pub trait ButtonPin {
    /// `true` solange der Taster gedrückt ist (Aktiv-Pegel bereits berücksichtigt)
    fn is_pressed(&mut self) -> bool;
}

/// Verbindungsloser Datagramm-Transport (UDP)
///
/// Beide Methoden dürfen nicht blockieren.
pub trait DatagramTransport {
    /// Übergibt ein Datagramm an den Netzwerk-Stack
    ///
    /// # Fehlerbehandlung
    /// Gibt einen `TransportError` zurück wenn der Stack das Datagramm nicht annimmt.
    /// Es gibt kein Retry.
    fn send_to(&mut self, endpoint: &Endpoint, payload: &[u8]) -> Result<(), TransportError>;

    /// Liest ein wartendes Datagramm, `None` wenn keins da ist
    fn try_receive(&mut self, buffer: &mut [u8]) -> Option<usize>;
}

/// Hardware-Watchdog
pub trait Watchdog {
    fn feed(&mut self);
}

/// Laufzeit-Diagnose (Verbindung, Speicher)
pub trait SystemMonitor {
    fn link_status(&self) -> LinkStatus;
    fn heap_stats(&self) -> HeapStats;
}
