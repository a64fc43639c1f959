// Taster an einem GPIO-Eingang
//
// Liefert nur den rohen Pegel, Entprellung und Gesten macht esp-core.

use esp_core::ButtonPin;
use esp_hal::gpio::{Input, InputConfig, InputPin, Pull};

/// Welcher Pegel "gedrückt" bedeutet
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ActiveLevel {
    /// Gegen GND geschaltet, Pull-Up hält den Pegel sonst HIGH
    Low,
    /// Gegen VCC geschaltet, (externer) Pull-Down hält den Pegel sonst LOW
    High,
}

pub struct GpioButton {
    input: Input<'static>,
    active: ActiveLevel,
}

impl GpioButton {
    /// Taster mit internem Pull-Up, gedrückt = LOW (z.B. Encoder-Taster)
    pub fn active_low(pin: impl InputPin + 'static) -> Self {
        Self::new(pin, Pull::Up, ActiveLevel::Low)
    }

    /// Taster mit externem Pull-Down, gedrückt = HIGH
    pub fn active_high(pin: impl InputPin + 'static) -> Self {
        Self::new(pin, Pull::None, ActiveLevel::High)
    }

    pub fn new(pin: impl InputPin + 'static, pull: Pull, active: ActiveLevel) -> Self {
        let input = Input::new(pin, InputConfig::default().with_pull(pull));
        Self { input, active }
    }
}

impl ButtonPin for GpioButton {
    fn is_pressed(&mut self) -> bool {
        match self.active {
            ActiveLevel::Low => self.input.is_low(),
            ActiveLevel::High => self.input.is_high(),
        }
    }
}
