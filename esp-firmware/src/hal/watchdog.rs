// Hardware-Watchdog auf Timer Group 1 (MWDT)
//
// Setzt den Chip zurück wenn die Hauptschleife länger als der Timeout hängt.
// Die Hauptschleife füttert ihn in jedem Tick.

use esp_core::Watchdog;
use esp_hal::peripherals::TIMG1;
use esp_hal::time::Duration;
use esp_hal::timer::timg::{MwdtStage, Wdt};

pub struct TimerWatchdog {
    wdt: Wdt<TIMG1<'static>>,
}

impl TimerWatchdog {
    /// Stage 0 mit `timeout_secs`, danach Reset
    pub fn start(mut wdt: Wdt<TIMG1<'static>>, timeout_secs: u64) -> Self {
        wdt.set_timeout(MwdtStage::Stage0, Duration::from_secs(timeout_secs));
        wdt.enable();
        wdt.feed();
        defmt::info!("Watchdog: enabled ({}s timeout)", timeout_secs);
        Self { wdt }
    }
}

impl Watchdog for TimerWatchdog {
    fn feed(&mut self) {
        self.wdt.feed();
    }
}
