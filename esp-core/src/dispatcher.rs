//! Event Dispatcher - übersetzt Eingaben in Zustand und Kommandos
//!
//! | Auslöser              | Wirkung                                                         |
//! |-----------------------|-----------------------------------------------------------------|
//! | Lampen-Taster Klick   | Lampe umschalten, Power-Kommando mit aktueller Helligkeit       |
//! | Encoder Klick         | aktuelle Farbtemperatur an alle eingeschalteten Lampen, weiter  |
//! | Encoder Doppelklick   | alle an falls keine an ist, sonst alle aus, an alle senden      |
//! | Drehung               | neue Helligkeit an alle eingeschalteten Lampen                  |
//!
//! Bei mehreren Zielen wird in Endpoint-Reihenfolge gesendet. Jeder Versand ist
//! unabhängig, ein Fehler bricht die restlichen nicht ab und der lokale
//! Zustand bleibt trotzdem geändert.

use crate::logic::{detents_to_brightness, next_color_temp_index};
use crate::protocol::{CommandError, CommandSender};
use crate::traits::DatagramTransport;
use crate::types::{ButtonEvent, Control, Endpoint, LightingState};

/// Ergebnis eines Auslösers: wie viele Kommandos versucht wurden und wie viele ankamen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    pub attempted: usize,
    pub sent: usize,
}

impl DispatchOutcome {
    fn record(&mut self, result: Result<u32, CommandError>) {
        self.attempted += 1;
        if result.is_ok() {
            self.sent += 1;
        }
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.sent
    }
}

pub struct Dispatcher<T: DatagramTransport, const N: usize> {
    endpoints: [Endpoint; N],
    state: LightingState<N>,
    sender: CommandSender<T>,
}

impl<T: DatagramTransport, const N: usize> Dispatcher<T, N> {
    pub fn new(endpoints: [Endpoint; N], sender: CommandSender<T>) -> Self {
        Self {
            endpoints,
            state: LightingState::new(),
            sender,
        }
    }

    pub fn state(&self) -> &LightingState<N> {
        &self.state
    }

    pub fn sender(&self) -> &CommandSender<T> {
        &self.sender
    }

    pub fn sender_mut(&mut self) -> &mut CommandSender<T> {
        &mut self.sender
    }

    /// Ein Taster-Event eines Bedienelements verarbeiten
    pub fn on_button(&mut self, control: Control, event: ButtonEvent) -> DispatchOutcome {
        match (control, event) {
            (Control::Lamp(index), ButtonEvent::Click) => self.toggle_lamp(index),
            (Control::Encoder, ButtonEvent::Click) => self.cycle_color_temp(),
            (Control::Encoder, ButtonEvent::DoubleClick) => self.toggle_all(),
            (control, event) => {
                info!("Ignoring {} on {}", event, control);
                DispatchOutcome::default()
            }
        }
    }

    /// Neuer (geklemmter) Encoder-Stand
    pub fn on_rotation(&mut self, detents: i32) -> DispatchOutcome {
        self.state.brightness = detents_to_brightness(detents);
        info!("Brightness: {}", self.state.brightness);

        let mut outcome = DispatchOutcome::default();
        let brightness = self.state.brightness;
        for (endpoint, on) in self.endpoints.iter().zip(self.state.power) {
            if on {
                outcome.record(self.sender.send_power(endpoint, true, brightness));
            }
        }

        if outcome.attempted == 0 {
            info!("  (All lights OFF - brightness will apply when turned ON)");
        }
        outcome
    }

    fn toggle_lamp(&mut self, index: usize) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let Some(endpoint) = self.endpoints.get(index) else {
            warn!("No endpoint configured for lamp button {}", index);
            return outcome;
        };

        let on = !self.state.power[index];
        self.state.power[index] = on;
        info!("{}: {}", endpoint.name, if on { "ON" } else { "OFF" });

        outcome.record(self.sender.send_power(endpoint, on, self.state.brightness));
        outcome
    }

    fn cycle_color_temp(&mut self) -> DispatchOutcome {
        let temperature = self.state.color_temperature();
        info!("Color temp: {}", temperature);

        let mut outcome = DispatchOutcome::default();
        let brightness = self.state.brightness;
        for (endpoint, on) in self.endpoints.iter().zip(self.state.power) {
            if on {
                outcome.record(self.sender.send_color_temp(
                    endpoint,
                    brightness,
                    temperature.kelvin(),
                ));
            }
        }

        // Zyklus läuft auch weiter wenn keine Lampe an ist
        self.state.color_temp_index = next_color_temp_index(self.state.color_temp_index);
        outcome
    }

    fn toggle_all(&mut self) -> DispatchOutcome {
        let on = !self.state.any_on();
        self.state.power = [on; N];
        info!(
            "Encoder button double-click: Turn all lights {}",
            if on { "ON" } else { "OFF" }
        );

        let mut outcome = DispatchOutcome::default();
        let brightness = self.state.brightness;
        for endpoint in &self.endpoints {
            outcome.record(self.sender.send_power(endpoint, on, brightness));
        }
        outcome
    }
}
