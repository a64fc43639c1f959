// Hardware Abstraction Layer (HAL) Module
//
// Konkrete Implementierungen der esp-core Traits für den ESP32-C6.
// In den Host-Tests werden stattdessen Mocks benutzt (esp-tests).

pub mod button;
pub mod encoder;
pub mod monitor;
pub mod udp;
pub mod watchdog;

pub use button::{ActiveLevel, GpioButton};
pub use encoder::{EncoderPins, PcntEncoder};
pub use monitor::NetworkMonitor;
pub use udp::{UdpBuffers, UdpTransport};
pub use watchdog::TimerWatchdog;
