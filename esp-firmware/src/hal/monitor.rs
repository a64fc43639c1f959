// Laufzeit-Diagnose: WiFi/IP-Status aus embassy-net, Heap aus esp-alloc

use embassy_net::Stack;
use esp_core::{HeapStats, LinkStatus, SystemMonitor};

pub struct NetworkMonitor {
    stack: Stack<'static>,
}

impl NetworkMonitor {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack }
    }
}

impl SystemMonitor for NetworkMonitor {
    fn link_status(&self) -> LinkStatus {
        match self.stack.config_v4() {
            Some(config) => LinkStatus::Connected(config.address.address()),
            None if self.stack.is_link_up() => LinkStatus::LinkUp,
            None => LinkStatus::Disconnected,
        }
    }

    fn heap_stats(&self) -> HeapStats {
        HeapStats {
            free: esp_alloc::HEAP.free(),
            used: esp_alloc::HEAP.used(),
        }
    }
}
