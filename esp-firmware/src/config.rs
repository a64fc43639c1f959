// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

use core::net::{AddrParseError, Ipv4Addr};

use esp_core::{ButtonConfig, Endpoint, LoopConfig};

// ============================================================================
// Encoder + Taster Konfiguration
// ============================================================================
//
// Die Pin-Nummern dienen der Doku und dem Startup-Log, die eigentliche
// Zuordnung passiert in main.rs über die typisierten Peripherals.

/// Encoder Kanal A (CLK)
pub const ENCODER_A_GPIO_PIN: u8 = 4;

/// Encoder Kanal B (DT)
pub const ENCODER_B_GPIO_PIN: u8 = 5;

/// Encoder Taster (SW), interner Pull-Up, gedrückt = LOW
pub const ENCODER_SW_GPIO_PIN: u8 = 6;

/// Taster für Lampe A, externer Pull-Down, gedrückt = HIGH
pub const BUTTON_A_GPIO_PIN: u8 = 2;

/// Taster für Lampe B, externer Pull-Down, gedrückt = HIGH
pub const BUTTON_B_GPIO_PIN: u8 = 3;

/// PCNT-Zählschritte pro Rastung (volle Quadratur: 4 Flanken)
pub const ENCODER_COUNTS_PER_DETENT: i32 = 4;

/// Glitch-Filter des PCNT in APB-Takten (max. 1023)
pub const ENCODER_FILTER_CYCLES: u16 = 1000;

/// Doppelklick-Fenster des Encoder-Tasters
pub const ENCODER_DOUBLE_CLICK_MS: u64 = 250;

/// Encoder-Taster: Klick (Farbtemperatur) + Doppelklick (alle an/aus)
pub const ENCODER_BUTTON: ButtonConfig =
    ButtonConfig::click_and_double_click(ENCODER_DOUBLE_CLICK_MS);

/// Lampen-Taster: nur Klick
pub const LAMP_BUTTON: ButtonConfig = ButtonConfig::click_only();

// ============================================================================
// Hauptschleife
// ============================================================================

/// Pause nach jedem Tick
pub const LOOP_TICK_MS: u64 = 10;

/// WiFi-Status Log-Intervall
pub const WIFI_CHECK_INTERVAL_MS: u64 = 30_000;

/// Heap Log-Intervall
pub const HEAP_REPORT_INTERVAL_MS: u64 = 60_000;

pub const LOOP_CONFIG: LoopConfig = LoopConfig {
    tick_ms: LOOP_TICK_MS,
    wifi_check_interval_ms: WIFI_CHECK_INTERVAL_MS,
    heap_report_interval_ms: HEAP_REPORT_INTERVAL_MS,
};

/// Watchdog-Timeout, die Hauptschleife füttert alle LOOP_TICK_MS
pub const WATCHDOG_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit nach fehlgeschlagenem Connect / nach Disconnect
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// Gesamt-Heap: ~100 KB für WiFi-Stack

// ============================================================================
// WiZ Lampen
// ============================================================================

/// IP der Lampe A (Taster A)
/// Wird zur Build-Zeit aus der Environment Variable WIZ_LAMP_A_IP geladen
pub const WIZ_LAMP_A_IP: &str = env!(
    "WIZ_LAMP_A_IP",
    "WIZ_LAMP_A_IP nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// IP der Lampe B (Taster B)
pub const WIZ_LAMP_B_IP: &str = env!(
    "WIZ_LAMP_B_IP",
    "WIZ_LAMP_B_IP nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Anzeigename der Lampe A in Logs (optional, Default "study")
pub const WIZ_LAMP_A_NAME: &str = match option_env!("WIZ_LAMP_A_NAME") {
    Some(name) => name,
    None => "study",
};

/// Anzeigename der Lampe B in Logs (optional, Default "uplight")
pub const WIZ_LAMP_B_NAME: &str = match option_env!("WIZ_LAMP_B_NAME") {
    Some(name) => name,
    None => "uplight",
};

/// Anzahl der Lampen (= Anzahl der Lampen-Taster)
pub const LAMP_COUNT: usize = 2;

/// Anzahl aller Taster (Encoder + Lampen)
pub const BUTTON_COUNT: usize = LAMP_COUNT + 1;

/// Lokaler UDP-Port von dem aus gesendet wird
pub const UDP_LOCAL_PORT: u16 = 38900;

/// UDP RX/TX Buffer-Größe in Bytes
pub const UDP_BUFFER_SIZE: usize = 512;

/// Anzahl der UDP Paket-Metadaten im Socket-Buffer
pub const UDP_METADATA_COUNT: usize = 8;

/// Lampen-Endpunkte aus der Build-Konfiguration, Reihenfolge = Sende-Reihenfolge
pub fn lamp_endpoints() -> Result<[Endpoint; LAMP_COUNT], AddrParseError> {
    Ok([
        Endpoint::new(WIZ_LAMP_A_NAME, WIZ_LAMP_A_IP.parse::<Ipv4Addr>()?),
        Endpoint::new(WIZ_LAMP_B_NAME, WIZ_LAMP_B_IP.parse::<Ipv4Addr>()?),
    ])
}
