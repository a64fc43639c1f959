//! Quantisierte Drehposition des Encoders
//!
//! Der Hardware-Zähler läuft frei, hier wird er bei jedem Tick zuerst
//! geklemmt und dann mit dem zuletzt gesehenen Stand verglichen.
//! Ohne das Klemmen entstünden "tote Zonen": nach Überdrehen an einer Grenze
//! müsste man den ganzen Überschuss zurückdrehen bevor sich wieder etwas tut.

use crate::logic::{MAX_DETENTS, MIN_DETENTS, clamp_detents};
use crate::traits::RotationCounter;

pub struct QuantizedRotation<R: RotationCounter> {
    counter: R,
    last_detents: i32,
}

impl<R: RotationCounter> QuantizedRotation<R> {
    /// Setzt den Zähler auf `initial_detents` (geklemmt) und merkt ihn als Ausgangswert
    pub fn new(mut counter: R, initial_detents: i32) -> Self {
        let initial = clamp_detents(initial_detents);
        counter.set_count(initial);
        Self {
            counter,
            last_detents: initial,
        }
    }

    /// Liest den Zähler, klemmt ihn und liefert den neuen Stand falls er sich geändert hat
    ///
    /// Das Zurückschreiben passiert nur wenn der Wert außerhalb liegt. Ändert die
    /// Hardware den Zähler zwischen Lesen und Schreiben, korrigiert der nächste Tick.
    pub fn poll(&mut self) -> Option<i32> {
        let raw = self.counter.count();

        let detents = if raw < MIN_DETENTS {
            self.counter.set_count(MIN_DETENTS);
            MIN_DETENTS
        } else if raw > MAX_DETENTS {
            self.counter.set_count(MAX_DETENTS);
            MAX_DETENTS
        } else {
            raw
        };

        if detents == self.last_detents {
            return None;
        }

        self.last_detents = detents;
        Some(detents)
    }

    /// Zuletzt gesehener (geklemmter) Stand
    pub fn detents(&self) -> i32 {
        self.last_detents
    }

    pub fn counter(&self) -> &R {
        &self.counter
    }

    pub fn counter_mut(&mut self) -> &mut R {
        &mut self.counter
    }
}
