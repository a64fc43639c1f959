// Task-Modul: Enthält alle Embassy Tasks
//
// Die Steuerung läuft komplett im Control Task, die WiFi Tasks halten
// nur die Verbindung. Es gibt keine Channels zwischen den Tasks.

pub mod control;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use control::control_task;
pub use wifi::{connection_task, dhcp_task, net_task};
