// Drehencoder über PCNT (Pulse Counter) Peripheral
//
// Die Hardware zählt Quadratur-Flanken selbstständig, der Zähler wird nur
// einmal pro Loop-Tick ausgelesen. Software rechnet Flanken in Rastungen um.

use esp_core::RotationCounter;
use esp_hal::gpio::Input;
use esp_hal::pcnt::{channel, unit};

/// Die beiden Encoder-Eingänge (müssen 'static sein, PCNT hält Referenzen)
pub struct EncoderPins {
    pub a: Input<'static>,
    pub b: Input<'static>,
}

/// Encoder auf PCNT Unit 0
///
/// Der Hardware-Zähler ist nur 16 Bit breit und läuft über. Die Differenz
/// zwischen zwei Lesungen wird deshalb mit `wrapping_sub` gebildet und in
/// einen 32-Bit Akkumulator addiert.
pub struct PcntEncoder {
    counter: unit::Counter<'static, 0>,
    last_raw: i16,
    /// Flanken seit Start (bzw. seit dem letzten `set_count`)
    accumulated: i32,
    counts_per_detent: i32,
}

impl PcntEncoder {
    /// Konfiguriert Unit 0 für volle Quadratur (beide Kanäle, 4 Flanken pro Periode)
    ///
    /// # Parameter
    /// - `unit`: PCNT Unit 0 (aus `Pcnt::new(peripherals.PCNT)`)
    /// - `pins`: Kanal A und B als Input
    /// - `filter_cycles`: Glitch-Filter in APB-Takten
    /// - `counts_per_detent`: Flanken pro mechanischer Rastung
    pub fn new(
        unit: &'static unit::Unit<'static, 0>,
        pins: &'static EncoderPins,
        filter_cycles: u16,
        counts_per_detent: i32,
    ) -> Self {
        if unit.set_filter(Some(filter_cycles.min(1023))).is_err() {
            defmt::warn!("Encoder: filter value rejected, running unfiltered");
        }
        unit.clear();

        let enc_a = pins.a.peripheral_input();
        let enc_b = pins.b.peripheral_input();

        let ch0 = &unit.channel0;
        ch0.set_ctrl_signal(enc_a.clone());
        ch0.set_edge_signal(enc_b.clone());
        ch0.set_ctrl_mode(channel::CtrlMode::Reverse, channel::CtrlMode::Keep);
        ch0.set_input_mode(channel::EdgeMode::Increment, channel::EdgeMode::Decrement);

        let ch1 = &unit.channel1;
        ch1.set_ctrl_signal(enc_b);
        ch1.set_edge_signal(enc_a);
        ch1.set_ctrl_mode(channel::CtrlMode::Reverse, channel::CtrlMode::Keep);
        ch1.set_input_mode(channel::EdgeMode::Decrement, channel::EdgeMode::Increment);

        unit.resume();

        let counter = unit.counter.clone();
        let last_raw = counter.get();

        Self {
            counter,
            last_raw,
            accumulated: 0,
            counts_per_detent: counts_per_detent.max(1),
        }
    }

    fn update(&mut self) {
        let raw = self.counter.get();
        let delta = raw.wrapping_sub(self.last_raw);
        self.last_raw = raw;
        self.accumulated = self.accumulated.wrapping_add(i32::from(delta));
    }
}

impl RotationCounter for PcntEncoder {
    fn count(&mut self) -> i32 {
        self.update();
        self.accumulated.div_euclid(self.counts_per_detent)
    }

    fn set_count(&mut self, detents: i32) {
        // Flanken die seit dem letzten Lesen dazukamen gehen verloren,
        // die Hardware zählt ab der aktuellen Position weiter
        self.last_raw = self.counter.get();
        self.accumulated = detents.saturating_mul(self.counts_per_detent);
    }
}
