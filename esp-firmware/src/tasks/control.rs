// Control Task - die Hauptschleife
//
// Ein Tick fragt Encoder und Taster ab, sendet Kommandos, leert den
// UDP-Empfangspuffer und füttert den Watchdog. Danach feste Pause.
use embassy_time::{Duration, Instant, Timer};

use crate::DimmerLoop;

/// Control Loop Task
///
/// Besitzt den ControlLoop exklusiv, es gibt keinen geteilten Zustand.
/// Endet nie; hängt der Tick, greift der Watchdog.
#[embassy_executor::task]
pub async fn control_task(mut control: DimmerLoop) -> ! {
    let tick = Duration::from_millis(control.config().tick_ms);
    defmt::info!("Control: loop running ({}ms tick)", control.config().tick_ms);

    loop {
        let report = control.tick(Instant::now().as_millis());

        if report.commands.failed() > 0 {
            defmt::warn!(
                "Control: {} of {} commands failed",
                report.commands.failed(),
                report.commands.attempted
            );
        }

        Timer::after(tick).await;
    }
}
