//! Supervisory Loop - ein Tick der Hauptschleife
//!
//! Reihenfolge pro Tick:
//!
//! 1. WiFi-Status loggen (alle 30s)
//! 2. Heap loggen (alle 60s)
//! 3. Empfangspuffer leeren (jeder Tick, bis nichts mehr da ist)
//! 4. Encoder + Taster abfragen, Events an den Dispatcher
//! 5. Watchdog füttern
//!
//! Der Aufrufer wartet nach jedem Tick eine feste Zeit (LoopConfig::tick_ms).
//! Im Tick selbst wird nie blockiert und nichts allokiert.

use crate::button::{ButtonConfig, ButtonDetector};
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::logic::brightness_to_detents;
use crate::rotation::QuantizedRotation;
use crate::traits::{ButtonPin, DatagramTransport, RotationCounter, SystemMonitor, Watchdog};
use crate::types::{Control, DEFAULT_BRIGHTNESS, LinkStatus};

/// Größe des Buffers in den eingehende Antworten gelesen (und verworfen) werden
pub const RECEIVE_BUFFER_SIZE: usize = 256;

/// Intervalle der Hauptschleife
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Feste Pause am Ende jedes Ticks
    pub tick_ms: u64,
    pub wifi_check_interval_ms: u64,
    pub heap_report_interval_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            wifi_check_interval_ms: 30_000,
            heap_report_interval_ms: 60_000,
        }
    }
}

/// Periodische Aufgabe mit eigenem "zuletzt gelaufen" Zeitstempel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    interval_ms: u64,
    last_run_ms: u64,
}

impl IntervalTimer {
    /// Erster Lauf nach einem vollen Intervall ab `start_ms`
    pub const fn new(interval_ms: u64, start_ms: u64) -> Self {
        Self {
            interval_ms,
            last_run_ms: start_ms,
        }
    }

    /// `true` wenn das Intervall abgelaufen ist, setzt dann den Zeitstempel neu
    pub fn is_due(&mut self, now_ms: u64) -> bool {
        if now_ms.wrapping_sub(self.last_run_ms) > self.interval_ms {
            self.last_run_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// Ein Taster mit seiner Gesten-Erkennung
pub struct ControlInput<P: ButtonPin> {
    control: Control,
    pin: P,
    detector: ButtonDetector,
}

impl<P: ButtonPin> ControlInput<P> {
    pub fn new(control: Control, pin: P, config: ButtonConfig) -> Self {
        Self {
            control,
            pin,
            detector: ButtonDetector::new(config),
        }
    }
}

/// Was in einem Tick passiert ist (für Tests und Debug-Logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Gelesene und verworfene Datagramme
    pub drained: usize,
    pub rotation: Option<i32>,
    /// Anzahl verarbeiteter Taster-Events
    pub button_events: usize,
    pub commands: DispatchOutcome,
}

/// Die komplette Steuerung: Eingaben, Zustand, Versand, Housekeeping
pub struct ControlLoop<R, P, T, M, W, const N: usize, const B: usize>
where
    R: RotationCounter,
    P: ButtonPin,
    T: DatagramTransport,
    M: SystemMonitor,
    W: Watchdog,
{
    config: LoopConfig,
    rotation: QuantizedRotation<R>,
    inputs: [ControlInput<P>; B],
    dispatcher: Dispatcher<T, N>,
    monitor: M,
    watchdog: W,
    wifi_check: IntervalTimer,
    heap_report: IntervalTimer,
    last_link: Option<LinkStatus>,
    receive_buffer: [u8; RECEIVE_BUFFER_SIZE],
}

impl<R, P, T, M, W, const N: usize, const B: usize> ControlLoop<R, P, T, M, W, N, B>
where
    R: RotationCounter,
    P: ButtonPin,
    T: DatagramTransport,
    M: SystemMonitor,
    W: Watchdog,
{
    /// Der Encoder wird auf die Start-Helligkeit gesetzt, damit der erste Tick
    /// keine Drehung meldet
    pub fn new(
        config: LoopConfig,
        counter: R,
        inputs: [ControlInput<P>; B],
        dispatcher: Dispatcher<T, N>,
        monitor: M,
        watchdog: W,
        start_ms: u64,
    ) -> Self {
        Self {
            config,
            rotation: QuantizedRotation::new(counter, brightness_to_detents(DEFAULT_BRIGHTNESS)),
            inputs,
            dispatcher,
            monitor,
            watchdog,
            wifi_check: IntervalTimer::new(config.wifi_check_interval_ms, start_ms),
            heap_report: IntervalTimer::new(config.heap_report_interval_ms, start_ms),
            last_link: None,
            receive_buffer: [0u8; RECEIVE_BUFFER_SIZE],
        }
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher<T, N> {
        &self.dispatcher
    }

    pub fn rotation(&self) -> &QuantizedRotation<R> {
        &self.rotation
    }

    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }

    /// Ein Durchlauf der Hauptschleife
    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        let mut report = TickReport::default();

        if self.wifi_check.is_due(now_ms) {
            self.report_link();
        }

        if self.heap_report.is_due(now_ms) {
            let heap = self.monitor.heap_stats();
            info!("[HEAP] free: {} bytes, used: {} bytes", heap.free, heap.used);
        }

        report.drained = self.drain_inbound();

        if let Some(detents) = self.rotation.poll() {
            report.rotation = Some(detents);
            merge(&mut report.commands, self.dispatcher.on_rotation(detents));
        }

        for input in self.inputs.iter_mut() {
            let pressed = input.pin.is_pressed();
            if let Some(event) = input.detector.poll(now_ms, pressed) {
                report.button_events += 1;
                merge(
                    &mut report.commands,
                    self.dispatcher.on_button(input.control, event),
                );
            }
        }

        self.watchdog.feed();
        report
    }

    fn report_link(&mut self) {
        let status = self.monitor.link_status();
        let changed = self.last_link.is_some_and(|last| last != status);

        if status.is_connected() {
            info!("[WIFI] {}", status);
        } else {
            // Reconnect übernimmt der WiFi-Task, hier wird nur beobachtet
            warn!("[WIFI] {} - waiting for auto-reconnect", status);
        }
        if changed {
            info!("[WIFI] status changed since last check");
        }
        self.last_link = Some(status);
    }

    /// Liest alle wartenden Antworten der Lampen und verwirft sie
    fn drain_inbound(&mut self) -> usize {
        let mut drained = 0;
        let transport = self.dispatcher.sender_mut().transport_mut();
        while let Some(len) = transport.try_receive(&mut self.receive_buffer) {
            debug!("Discarded {} byte response", len);
            drained += 1;
        }
        drained
    }
}

fn merge(total: &mut DispatchOutcome, outcome: DispatchOutcome) {
    total.attempted += outcome.attempted;
    total.sent += outcome.sent;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_timer_first_run_after_interval() {
        let mut timer = IntervalTimer::new(30_000, 0);
        assert!(!timer.is_due(10));
        assert!(!timer.is_due(30_000));
        assert!(timer.is_due(30_001));
        assert!(!timer.is_due(30_010));
    }

    #[test]
    fn test_interval_timer_rearms() {
        let mut timer = IntervalTimer::new(100, 0);
        assert!(timer.is_due(150));
        assert!(!timer.is_due(200));
        assert!(timer.is_due(251));
    }

    #[test]
    fn test_default_loop_config() {
        let config = LoopConfig::default();
        assert_eq!(config.tick_ms, 10);
        assert_eq!(config.wifi_check_interval_ms, 30_000);
        assert_eq!(config.heap_report_interval_ms, 60_000);
    }
}
