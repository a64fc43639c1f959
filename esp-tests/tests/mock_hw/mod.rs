//! Mock-Hardware für Host-Tests
//!
//! Alle Mocks teilen ihren Zustand über `Rc<RefCell<..>>`, damit Tests nach
//! der Übergabe an den ControlLoop noch Pegel setzen und Sendungen prüfen können.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::rc::Rc;

use esp_core::{
    ButtonPin, DatagramTransport, Endpoint, HeapStats, LinkStatus, RotationCounter, SystemMonitor,
    TransportError, Watchdog,
};

pub const LAMP_A: Endpoint = Endpoint::new("study", Ipv4Addr::new(192, 168, 1, 50));
pub const LAMP_B: Endpoint = Endpoint::new("uplight", Ipv4Addr::new(192, 168, 1, 51));

/// Gemeinsames Protokoll der Hardware-Zugriffe in Aufruf-Reihenfolge
pub type Trace = Rc<RefCell<Vec<&'static str>>>;

// ============================================================================
// Mock Transport
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentDatagram {
    pub endpoint: Endpoint,
    pub payload: String,
}

#[derive(Default)]
pub struct TransportLog {
    pub sent: Vec<SentDatagram>,
    /// Anzahl aller send_to() Aufrufe (auch fehlgeschlagene)
    pub attempts: usize,
    /// Simuliere Fehler beim nächsten send_to()
    pub fail_next_send: bool,
    /// Alle Sendungen an diese IP schlagen fehl
    pub unreachable: Option<Ipv4Addr>,
    /// Eingehende Antworten die gelesen werden wollen
    pub inbound: VecDeque<Vec<u8>>,
}

#[derive(Clone, Default)]
pub struct MockTransport {
    pub log: Rc<RefCell<TransportLog>>,
    pub trace: Trace,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace(trace: Trace) -> Self {
        Self {
            trace,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentDatagram> {
        self.log.borrow().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.log.borrow().sent.len()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().sent.clear();
    }

    pub fn push_inbound(&self, payload: &[u8]) {
        self.log.borrow_mut().inbound.push_back(payload.to_vec());
    }
}

impl DatagramTransport for MockTransport {
    fn send_to(&mut self, endpoint: &Endpoint, payload: &[u8]) -> Result<(), TransportError> {
        self.trace.borrow_mut().push("send");
        let mut log = self.log.borrow_mut();
        log.attempts += 1;

        if log.fail_next_send {
            log.fail_next_send = false;
            return Err(TransportError::SendFailed);
        }
        if log.unreachable == Some(endpoint.ip) {
            return Err(TransportError::NoRoute);
        }

        log.sent.push(SentDatagram {
            endpoint: *endpoint,
            payload: String::from_utf8(payload.to_vec()).unwrap(),
        });
        Ok(())
    }

    fn try_receive(&mut self, buffer: &mut [u8]) -> Option<usize> {
        let datagram = self.log.borrow_mut().inbound.pop_front()?;
        self.trace.borrow_mut().push("receive");
        let len = datagram.len().min(buffer.len());
        buffer[..len].copy_from_slice(&datagram[..len]);
        Some(len)
    }
}

// ============================================================================
// Mock Encoder-Zähler
// ============================================================================

#[derive(Clone, Default)]
pub struct MockCounter {
    pub value: Rc<Cell<i32>>,
    pub writes: Rc<Cell<usize>>,
}

impl MockCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simuliert Drehen (Hardware schreibt asynchron)
    pub fn rotate(&self, detents: i32) {
        self.value.set(self.value.get() + detents);
    }
}

impl RotationCounter for MockCounter {
    fn count(&mut self) -> i32 {
        self.value.get()
    }

    fn set_count(&mut self, detents: i32) {
        self.value.set(detents);
        self.writes.set(self.writes.get() + 1);
    }
}

// ============================================================================
// Mock Taster
// ============================================================================

#[derive(Clone, Default)]
pub struct MockButton {
    pub pressed: Rc<Cell<bool>>,
}

impl MockButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pressed: bool) {
        self.pressed.set(pressed);
    }
}

impl ButtonPin for MockButton {
    fn is_pressed(&mut self) -> bool {
        self.pressed.get()
    }
}

// ============================================================================
// Mock Watchdog + Monitor
// ============================================================================

#[derive(Default)]
pub struct MockWatchdog {
    pub feed_count: usize,
    pub trace: Trace,
}

impl MockWatchdog {
    pub fn with_trace(trace: Trace) -> Self {
        Self {
            feed_count: 0,
            trace,
        }
    }
}

impl Watchdog for MockWatchdog {
    fn feed(&mut self) {
        self.feed_count += 1;
        self.trace.borrow_mut().push("feed");
    }
}

#[derive(Clone)]
pub struct MockMonitor {
    pub link: Rc<Cell<LinkStatus>>,
    pub heap_queries: Rc<Cell<usize>>,
    pub link_queries: Rc<Cell<usize>>,
}

impl MockMonitor {
    pub fn new() -> Self {
        Self {
            link: Rc::new(Cell::new(LinkStatus::Connected(Ipv4Addr::new(
                192, 168, 1, 20,
            )))),
            heap_queries: Rc::new(Cell::new(0)),
            link_queries: Rc::new(Cell::new(0)),
        }
    }
}

impl SystemMonitor for MockMonitor {
    fn link_status(&self) -> LinkStatus {
        self.link_queries.set(self.link_queries.get() + 1);
        self.link.get()
    }

    fn heap_stats(&self) -> HeapStats {
        self.heap_queries.set(self.heap_queries.get() + 1);
        HeapStats {
            free: 48_000,
            used: 52_000,
        }
    }
}
