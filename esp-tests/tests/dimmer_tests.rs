//! Integration Tests für die Dimmer-Steuerung
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen Mock-Hardware

mod mock_hw;

use esp_core::{
    ButtonConfig, ButtonEvent, CommandSender, Control, ControlInput, ControlLoop, Dispatcher,
    LinkStatus, LoopConfig, MAX_DETENTS, MIN_DETENTS, TickReport, TransportError,
};
use mock_hw::{
    LAMP_A, LAMP_B, MockButton, MockCounter, MockMonitor, MockTransport, MockWatchdog, Trace,
};

type TestDispatcher = Dispatcher<MockTransport, 2>;
type TestLoop =
    ControlLoop<MockCounter, MockButton, MockTransport, MockMonitor, MockWatchdog, 2, 3>;

fn dispatcher() -> (TestDispatcher, MockTransport) {
    let transport = MockTransport::new();
    let dispatcher = Dispatcher::new([LAMP_A, LAMP_B], CommandSender::new(transport.clone()));
    (dispatcher, transport)
}

fn power_on(id: u32, dimming: u8) -> String {
    format!(r#"{{"id":{id},"method":"setPilot","params":{{"state":true,"dimming":{dimming}}}}}"#)
}

fn power_off(id: u32) -> String {
    format!(r#"{{"id":{id},"method":"setPilot","params":{{"state":false}}}}"#)
}

fn color_temp(id: u32, dimming: u8, temp: u16) -> String {
    format!(r#"{{"id":{id},"method":"setPilot","params":{{"dimming":{dimming},"temp":{temp}}}}}"#)
}

// ============================================================================
// Test-Rig: ControlLoop mit Mock-Hardware
// ============================================================================

struct Rig {
    control: TestLoop,
    transport: MockTransport,
    counter: MockCounter,
    encoder_button: MockButton,
    lamp_a_button: MockButton,
    lamp_b_button: MockButton,
    monitor: MockMonitor,
    trace: Trace,
    now_ms: u64,
}

impl Rig {
    fn new() -> Self {
        let trace = Trace::default();
        let transport = MockTransport::with_trace(trace.clone());
        let counter = MockCounter::new();
        let encoder_button = MockButton::new();
        let lamp_a_button = MockButton::new();
        let lamp_b_button = MockButton::new();
        let monitor = MockMonitor::new();

        let inputs = [
            ControlInput::new(
                Control::Encoder,
                encoder_button.clone(),
                ButtonConfig::click_and_double_click(250),
            ),
            ControlInput::new(
                Control::Lamp(0),
                lamp_a_button.clone(),
                ButtonConfig::click_only(),
            ),
            ControlInput::new(
                Control::Lamp(1),
                lamp_b_button.clone(),
                ButtonConfig::click_only(),
            ),
        ];
        let dispatcher = Dispatcher::new([LAMP_A, LAMP_B], CommandSender::new(transport.clone()));

        let control = ControlLoop::new(
            LoopConfig::default(),
            counter.clone(),
            inputs,
            dispatcher,
            monitor.clone(),
            MockWatchdog::with_trace(trace.clone()),
            0,
        );

        Self {
            control,
            transport,
            counter,
            encoder_button,
            lamp_a_button,
            lamp_b_button,
            monitor,
            trace,
            now_ms: 0,
        }
    }

    /// Tickt im 10ms-Raster für `ms` Millisekunden
    fn run_for(&mut self, ms: u64) -> Vec<TickReport> {
        let end = self.now_ms + ms;
        let mut reports = Vec::new();
        while self.now_ms < end {
            reports.push(self.control.tick(self.now_ms));
            self.now_ms += self.control.config().tick_ms;
        }
        reports
    }

    /// Kurzer Druck (60ms) und 60ms losgelassen
    fn click(&mut self, button: MockButton) {
        button.set(true);
        self.run_for(60);
        button.set(false);
        self.run_for(60);
    }

    fn click_encoder_and_settle(&mut self) {
        self.click(self.encoder_button.clone());
        self.run_for(400);
    }

    fn double_click_encoder(&mut self) {
        self.click(self.encoder_button.clone());
        self.click(self.encoder_button.clone());
        self.run_for(400);
    }

    fn power(&self) -> [bool; 2] {
        self.control.dispatcher().state().power
    }

    fn brightness(&self) -> u8 {
        self.control.dispatcher().state().brightness
    }
}

// ============================================================================
// Tests: Dispatcher
// ============================================================================

#[test]
fn test_initial_state() {
    let (dispatcher, transport) = dispatcher();
    let state = dispatcher.state();
    assert_eq!(state.brightness, 50);
    assert_eq!(state.power, [false, false]);
    assert_eq!(state.color_temp_index, 0);
    assert_eq!(transport.sent_count(), 0);
}

#[test]
fn test_lamp_click_toggles_and_sends() {
    let (mut dispatcher, transport) = dispatcher();

    let outcome = dispatcher.on_button(Control::Lamp(0), ButtonEvent::Click);

    assert_eq!(outcome.attempted, 1);
    assert_eq!(outcome.sent, 1);
    assert_eq!(dispatcher.state().power, [true, false]);
    let sent = transport.sent();
    assert_eq!(sent[0].endpoint, LAMP_A);
    assert_eq!(sent[0].payload, power_on(1, 50));
}

#[test]
fn test_lamp_toggle_twice_restores_state() {
    let (mut dispatcher, transport) = dispatcher();

    dispatcher.on_button(Control::Lamp(1), ButtonEvent::Click);
    dispatcher.on_button(Control::Lamp(1), ButtonEvent::Click);

    assert_eq!(dispatcher.state().power, [false, false]);
    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].endpoint, LAMP_B);
    assert_eq!(sent[0].payload, power_on(1, 50));
    assert_eq!(sent[1].payload, power_off(2));
}

#[test]
fn test_rotation_with_all_off_sends_nothing() {
    let (mut dispatcher, transport) = dispatcher();

    let outcome = dispatcher.on_rotation(40);

    assert_eq!(dispatcher.state().brightness, 80);
    assert_eq!(outcome.attempted, 0);
    assert_eq!(transport.sent_count(), 0);
}

#[test]
fn test_rotation_only_targets_lamps_that_are_on() {
    let (mut dispatcher, transport) = dispatcher();
    dispatcher.on_button(Control::Lamp(1), ButtonEvent::Click);
    transport.clear();

    let outcome = dispatcher.on_rotation(20);

    assert_eq!(outcome.attempted, 1);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].endpoint, LAMP_B);
    assert_eq!(sent[0].payload, power_on(2, 40));
}

#[test]
fn test_rotation_sends_in_endpoint_order() {
    let (mut dispatcher, transport) = dispatcher();
    dispatcher.on_button(Control::Lamp(1), ButtonEvent::Click);
    dispatcher.on_button(Control::Lamp(0), ButtonEvent::Click);
    transport.clear();

    dispatcher.on_rotation(30);

    let sent = transport.sent();
    assert_eq!(sent[0].endpoint, LAMP_A);
    assert_eq!(sent[1].endpoint, LAMP_B);
}

#[test]
fn test_encoder_click_cycles_even_when_all_off() {
    let (mut dispatcher, transport) = dispatcher();

    for _ in 0..4 {
        let outcome = dispatcher.on_button(Control::Encoder, ButtonEvent::Click);
        assert_eq!(outcome.attempted, 0);
    }

    assert_eq!(dispatcher.state().color_temp_index, 0);
    assert_eq!(dispatcher.state().color_temperature().kelvin(), 2200);
    assert_eq!(transport.sent_count(), 0);
}

#[test]
fn test_encoder_click_sends_current_temp_then_advances() {
    let (mut dispatcher, transport) = dispatcher();
    dispatcher.on_button(Control::Lamp(0), ButtonEvent::Click);

    dispatcher.on_button(Control::Encoder, ButtonEvent::Click);
    dispatcher.on_button(Control::Encoder, ButtonEvent::Click);

    let sent = transport.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[1].payload, color_temp(2, 50, 2200));
    assert_eq!(sent[2].payload, color_temp(3, 50, 2700));
    assert_eq!(dispatcher.state().color_temp_index, 2);
}

#[test]
fn test_double_click_turns_all_on_when_all_off() {
    let (mut dispatcher, transport) = dispatcher();

    let outcome = dispatcher.on_button(Control::Encoder, ButtonEvent::DoubleClick);

    assert_eq!(outcome.attempted, 2);
    assert_eq!(dispatcher.state().power, [true, true]);
    let sent = transport.sent();
    assert_eq!(sent[0].endpoint, LAMP_A);
    assert_eq!(sent[0].payload, power_on(1, 50));
    assert_eq!(sent[1].endpoint, LAMP_B);
    assert_eq!(sent[1].payload, power_on(2, 50));
}

#[test]
fn test_double_click_turns_all_off_when_any_on() {
    let (mut dispatcher, transport) = dispatcher();
    dispatcher.on_button(Control::Lamp(1), ButtonEvent::Click);
    transport.clear();

    dispatcher.on_button(Control::Encoder, ButtonEvent::DoubleClick);

    assert_eq!(dispatcher.state().power, [false, false]);
    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].payload, power_off(2));
    assert_eq!(sent[1].payload, power_off(3));
}

#[test]
fn test_unbound_events_are_ignored() {
    let (mut dispatcher, transport) = dispatcher();

    let outcome = dispatcher.on_button(Control::Lamp(0), ButtonEvent::LongPress);
    assert_eq!(outcome.attempted, 0);
    let outcome = dispatcher.on_button(Control::Lamp(7), ButtonEvent::Click);
    assert_eq!(outcome.attempted, 0);

    assert_eq!(dispatcher.state().power, [false, false]);
    assert_eq!(transport.sent_count(), 0);
}

// ============================================================================
// Tests: Fehlerbehandlung
// ============================================================================

#[test]
fn test_failed_send_keeps_local_state() {
    let (mut dispatcher, transport) = dispatcher();
    transport.log.borrow_mut().fail_next_send = true;

    let outcome = dispatcher.on_button(Control::Lamp(0), ButtonEvent::Click);

    assert_eq!(outcome.attempted, 1);
    assert_eq!(outcome.sent, 0);
    assert_eq!(outcome.failed(), 1);
    assert_eq!(dispatcher.state().power, [true, false]);
    assert_eq!(transport.sent_count(), 0);
}

#[test]
fn test_failure_for_one_lamp_does_not_block_the_other() {
    let (mut dispatcher, transport) = dispatcher();
    dispatcher.on_button(Control::Encoder, ButtonEvent::DoubleClick);
    transport.clear();
    transport.log.borrow_mut().unreachable = Some(LAMP_A.ip);

    let outcome = dispatcher.on_rotation(45);

    assert_eq!(outcome.attempted, 2);
    assert_eq!(outcome.sent, 1);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].endpoint, LAMP_B);
    assert_eq!(dispatcher.state().brightness, 90);
}

#[test]
fn test_failed_send_does_not_consume_request_id() {
    let (mut dispatcher, transport) = dispatcher();
    transport.log.borrow_mut().fail_next_send = true;

    dispatcher.on_button(Control::Lamp(0), ButtonEvent::Click);
    assert_eq!(dispatcher.sender().next_id(), 1);
    dispatcher.on_button(Control::Lamp(1), ButtonEvent::Click);

    assert_eq!(transport.sent()[0].payload, power_on(1, 50));
    assert_eq!(dispatcher.sender().next_id(), 2);
}

#[test]
fn test_command_sender_reports_transport_error() {
    let mut transport = MockTransport::new();
    transport.log.borrow_mut().unreachable = Some(LAMP_A.ip);
    let mut sender = CommandSender::new(transport.clone());

    let result = sender.send_power(&LAMP_A, true, 50);
    assert_eq!(
        result,
        Err(esp_core::CommandError::Transport(TransportError::NoRoute))
    );
    assert_eq!(sender.send_power(&LAMP_B, true, 50), Ok(1));
    assert_eq!(sender.send_color_temp(&LAMP_B, 50, 4000), Ok(2));

    let mut buffer = [0u8; 8];
    assert_eq!(
        esp_core::DatagramTransport::try_receive(&mut transport, &mut buffer),
        None
    );
}

// ============================================================================
// Tests: ControlLoop
// ============================================================================

#[test]
fn test_idle_ticks_send_nothing_and_feed_watchdog() {
    let mut rig = Rig::new();

    let reports = rig.run_for(1000);

    assert_eq!(reports.len(), 100);
    assert!(reports.iter().all(|r| r.rotation.is_none() && r.button_events == 0));
    assert_eq!(rig.control.watchdog().feed_count, 100);
    assert_eq!(rig.transport.sent_count(), 0);
}

#[test]
fn test_tick_order_is_drain_then_send_then_feed() {
    let mut rig = Rig::new();
    rig.click(rig.lamp_a_button.clone());
    rig.trace.borrow_mut().clear();

    rig.transport.push_inbound(br#"{"method":"setPilot","result":{"success":true}}"#);
    rig.counter.rotate(3);
    rig.run_for(10);

    assert_eq!(*rig.trace.borrow(), ["receive", "send", "feed"]);
}

#[test]
fn test_watchdog_is_fed_last_in_every_tick() {
    let mut rig = Rig::new();
    rig.click(rig.lamp_a_button.clone());
    rig.trace.borrow_mut().clear();

    for step in [4, -2, 7] {
        rig.transport.push_inbound(b"{}");
        rig.counter.rotate(step);
        rig.run_for(10);
        assert_eq!(rig.trace.borrow().last(), Some(&"feed"));
        assert_eq!(rig.trace.borrow().iter().filter(|s| **s == "feed").count(), 1);
        assert!(rig.trace.borrow().contains(&"send"));
        rig.trace.borrow_mut().clear();
    }
}

#[test]
fn test_encoder_starts_at_default_brightness() {
    let rig = Rig::new();
    assert_eq!(rig.counter.value.get(), 25);
    assert_eq!(rig.control.rotation().detents(), 25);
}

#[test]
fn test_loop_rotation_updates_brightness() {
    let mut rig = Rig::new();
    rig.counter.rotate(5);

    let reports = rig.run_for(10);

    assert_eq!(reports[0].rotation, Some(30));
    assert_eq!(rig.brightness(), 60);
}

#[test]
fn test_loop_clamps_overshoot_every_tick() {
    let mut rig = Rig::new();

    rig.counter.rotate(100);
    rig.run_for(10);
    assert_eq!(rig.counter.value.get(), MAX_DETENTS);
    assert_eq!(rig.brightness(), 100);

    rig.counter.rotate(-200);
    rig.run_for(10);
    assert_eq!(rig.counter.value.get(), MIN_DETENTS);
    assert_eq!(rig.brightness(), 10);

    // Eine Rastung zurück wirkt sofort
    rig.counter.rotate(1);
    rig.run_for(10);
    assert_eq!(rig.brightness(), 12);
}

#[test]
fn test_loop_drains_all_inbound_datagrams() {
    let mut rig = Rig::new();
    for _ in 0..5 {
        rig.transport
            .push_inbound(br#"{"method":"setPilot","id":1,"result":{"success":true}}"#);
    }

    let reports = rig.run_for(20);

    assert_eq!(reports[0].drained, 5);
    assert_eq!(reports[1].drained, 0);
}

#[test]
fn test_loop_lamp_button_click() {
    let mut rig = Rig::new();

    rig.click(rig.lamp_a_button.clone());

    assert_eq!(rig.power(), [true, false]);
    assert_eq!(rig.transport.sent()[0].payload, power_on(1, 50));
}

#[test]
fn test_loop_encoder_click_resolves_after_window() {
    let mut rig = Rig::new();
    rig.click(rig.lamp_a_button.clone());
    rig.click(rig.encoder_button.clone());

    // Klick ist noch im Doppelklick-Fenster
    assert_eq!(rig.control.dispatcher().state().color_temp_index, 0);

    rig.run_for(400);
    assert_eq!(rig.control.dispatcher().state().color_temp_index, 1);
    assert_eq!(rig.transport.sent()[1].payload, color_temp(2, 50, 2200));
}

#[test]
fn test_loop_double_click_has_no_click_effect() {
    let mut rig = Rig::new();

    rig.double_click_encoder();

    assert_eq!(rig.power(), [true, true]);
    assert_eq!(rig.control.dispatcher().state().color_temp_index, 0);
    assert_eq!(rig.transport.sent_count(), 2);
}

#[test]
fn test_loop_four_encoder_clicks_return_to_2200k() {
    let mut rig = Rig::new();

    for _ in 0..4 {
        rig.click_encoder_and_settle();
    }

    let state = rig.control.dispatcher().state();
    assert_eq!(state.color_temp_index, 0);
    assert_eq!(state.color_temperature().kelvin(), 2200);
    assert_eq!(rig.transport.sent_count(), 0);
}

#[test]
fn test_loop_wifi_and_heap_checks_are_periodic() {
    let mut rig = Rig::new();

    rig.run_for(30_000);
    assert_eq!(rig.monitor.link_queries.get(), 0);
    rig.run_for(20);
    assert_eq!(rig.monitor.link_queries.get(), 1);
    assert_eq!(rig.monitor.heap_queries.get(), 0);

    rig.run_for(30_020);
    assert_eq!(rig.monitor.link_queries.get(), 2);
    assert_eq!(rig.monitor.heap_queries.get(), 1);
}

#[test]
fn test_loop_keeps_running_while_disconnected() {
    let mut rig = Rig::new();
    rig.monitor.link.set(LinkStatus::Disconnected);
    rig.transport.log.borrow_mut().unreachable = Some(LAMP_A.ip);

    rig.run_for(31_000);
    rig.click(rig.lamp_a_button.clone());

    assert_eq!(rig.power(), [true, false]);
    assert_eq!(rig.transport.sent_count(), 0);
    assert_eq!(rig.control.watchdog().feed_count, 3112);
}

// ============================================================================
// Tests: Komplettes Szenario
// ============================================================================

#[test]
fn test_scenario_rotate_click_double_click() {
    let mut rig = Rig::new();

    // Drehen auf 66%: beide aus, also nichts senden
    rig.counter.rotate(8);
    rig.run_for(10);
    assert_eq!(rig.brightness(), 66);
    assert_eq!(rig.transport.sent_count(), 0);

    // Lampe A an
    rig.click(rig.lamp_a_button.clone());
    assert_eq!(rig.power(), [true, false]);
    let sent = rig.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].endpoint, LAMP_A);
    assert_eq!(sent[0].payload, power_on(1, 66));

    // Doppelklick: eine Lampe ist an, also alle aus
    rig.double_click_encoder();
    assert_eq!(rig.power(), [false, false]);
    let sent = rig.transport.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[1].endpoint, LAMP_A);
    assert_eq!(sent[1].payload, power_off(2));
    assert_eq!(sent[2].endpoint, LAMP_B);
    assert_eq!(sent[2].payload, power_off(3));
}
