//! Entprellte Taster mit Klick-, Doppelklick- und Langdruck-Erkennung.
//!
//! Der rohe Pegel wird einmal pro Loop-Tick abgetastet. Ein Pegelwechsel gilt
//! erst wenn er `debounce_ms` stabil ist. Danach klassifiziert eine kleine
//! State-Machine die Geste:
//!
//! | Geste       | Bedingung                                                 | Event         |
//! |-------------|-----------------------------------------------------------|---------------|
//! | Klick       | Loslassen innerhalb `click_ms` nach dem Drücken           | `Click`       |
//! | Doppelklick | zweiter Klick beginnt innerhalb `double_click_ms`         | `DoubleClick` |
//! | Langdruck   | gehalten >= `long_press_ms` (nur wenn aktiviert)          | `LongPress`   |
//!
//! Mit `suppress_click_before_double_click` wird der erste Klick erst nach
//! Ablauf des Doppelklick-Fensters gemeldet, ein Doppelklick erzeugt dann
//! genau ein Event.

use crate::types::ButtonEvent;

/// Timing und Features eines Tasters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonConfig {
    /// Entprellzeit in ms
    pub debounce_ms: u64,
    /// Maximale Druckdauer für einen Klick
    pub click_ms: u64,
    /// Fenster zwischen Loslassen und erneutem Drücken für einen Doppelklick
    pub double_click_ms: u64,
    pub long_press_ms: u64,
    pub double_click: bool,
    pub long_press: bool,
    pub suppress_click_before_double_click: bool,
}

impl ButtonConfig {
    /// Einfacher Taster: nur Klick
    pub const fn click_only() -> Self {
        Self {
            debounce_ms: 20,
            click_ms: 200,
            double_click_ms: 400,
            long_press_ms: 1000,
            double_click: false,
            long_press: false,
            suppress_click_before_double_click: false,
        }
    }

    /// Encoder-Taster: Klick + Doppelklick, Klick wird bis zum Fensterende zurückgehalten
    pub const fn click_and_double_click(window_ms: u64) -> Self {
        Self {
            debounce_ms: 20,
            click_ms: window_ms,
            double_click_ms: window_ms,
            long_press_ms: 1000,
            double_click: true,
            long_press: false,
            suppress_click_before_double_click: true,
        }
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self::click_only()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Idle,
    /// Taster gedrückt. `after_click` = Zeitpunkt des ersten Klicks falls das
    /// der zweite Druck eines möglichen Doppelklicks ist
    Pressed {
        since_ms: u64,
        after_click: Option<Pending>,
    },
    /// Langdruck gemeldet, warte auf Loslassen
    Held,
    /// Klick erkannt, Doppelklick-Fenster läuft
    ClickPending(Pending),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    released_ms: u64,
    /// Klick wurde schon gemeldet (ohne Unterdrückung)
    reported: bool,
}

/// Gesten-Erkennung für einen Taster
pub struct ButtonDetector {
    config: ButtonConfig,
    raw_pressed: bool,
    raw_changed_ms: u64,
    stable_pressed: bool,
    gesture: Gesture,
}

impl ButtonDetector {
    pub fn new(config: ButtonConfig) -> Self {
        Self {
            config,
            raw_pressed: false,
            raw_changed_ms: 0,
            stable_pressed: false,
            gesture: Gesture::Idle,
        }
    }

    /// Einmal pro Tick aufrufen mit aktueller Zeit und rohem Pegel.
    /// Liefert höchstens ein Event.
    pub fn poll(&mut self, now_ms: u64, pressed: bool) -> Option<ButtonEvent> {
        if pressed != self.raw_pressed {
            self.raw_pressed = pressed;
            self.raw_changed_ms = now_ms;
        }

        // Abgelaufenes Doppelklick-Fenster zuerst auflösen
        let mut event = self.check_timeouts(now_ms);

        if self.raw_pressed != self.stable_pressed
            && now_ms.saturating_sub(self.raw_changed_ms) >= self.config.debounce_ms
        {
            self.stable_pressed = self.raw_pressed;
            let edge_event = if self.stable_pressed {
                self.on_press(now_ms)
            } else {
                self.on_release(now_ms)
            };
            event = event.or(edge_event);
        }

        event
    }

    fn check_timeouts(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        match self.gesture {
            Gesture::ClickPending(pending)
                if now_ms.saturating_sub(pending.released_ms) > self.config.double_click_ms =>
            {
                self.gesture = Gesture::Idle;
                (!pending.reported).then_some(ButtonEvent::Click)
            }
            // Fenster abgelaufen während der zweite Druck noch gehalten wird:
            // erster Klick zählt, der Druck läuft als normaler Druck weiter
            Gesture::Pressed {
                since_ms,
                after_click: Some(pending),
            } if now_ms.saturating_sub(pending.released_ms) > self.config.double_click_ms => {
                self.gesture = Gesture::Pressed {
                    since_ms,
                    after_click: None,
                };
                (!pending.reported).then_some(ButtonEvent::Click)
            }
            Gesture::Pressed { since_ms, .. }
                if self.config.long_press
                    && now_ms.saturating_sub(since_ms) >= self.config.long_press_ms =>
            {
                self.gesture = Gesture::Held;
                Some(ButtonEvent::LongPress)
            }
            _ => None,
        }
    }

    fn on_press(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let after_click = match self.gesture {
            Gesture::ClickPending(pending) => Some(pending),
            _ => None,
        };
        self.gesture = Gesture::Pressed {
            since_ms: now_ms,
            after_click,
        };
        None
    }

    fn on_release(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let Gesture::Pressed {
            since_ms,
            after_click,
        } = self.gesture
        else {
            self.gesture = Gesture::Idle;
            return None;
        };

        let is_click = now_ms.saturating_sub(since_ms) <= self.config.click_ms;

        match (is_click, after_click) {
            (true, Some(_)) => {
                self.gesture = Gesture::Idle;
                Some(ButtonEvent::DoubleClick)
            }
            (true, None) if self.config.double_click => {
                let reported = !self.config.suppress_click_before_double_click;
                self.gesture = Gesture::ClickPending(Pending {
                    released_ms: now_ms,
                    reported,
                });
                reported.then_some(ButtonEvent::Click)
            }
            (true, None) => {
                self.gesture = Gesture::Idle;
                Some(ButtonEvent::Click)
            }
            // Zweiter Druck zu lang: der erste Klick bleibt gültig
            (false, Some(pending)) => {
                self.gesture = Gesture::Idle;
                (!pending.reported).then_some(ButtonEvent::Click)
            }
            (false, None) => {
                self.gesture = Gesture::Idle;
                None
            }
        }
    }
}
