// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_time::{Duration, Instant, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::pcnt::Pcnt;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use defmt::info;

// Steuerung (plattformunabhängig)
use esp_core::{CommandSender, Control, ControlInput, ControlLoop, Dispatcher};

// Projekt-Module und Konfiguration
use esp_wiz_dimmer::config::{
    BUTTON_A_GPIO_PIN, BUTTON_B_GPIO_PIN, ENCODER_A_GPIO_PIN, ENCODER_B_GPIO_PIN, ENCODER_BUTTON,
    ENCODER_COUNTS_PER_DETENT, ENCODER_FILTER_CYCLES, ENCODER_SW_GPIO_PIN, EXTRA_HEAP_SIZE,
    LAMP_BUTTON, LOOP_CONFIG, UDP_BUFFER_SIZE, UDP_LOCAL_PORT, UDP_METADATA_COUNT,
    WATCHDOG_TIMEOUT_SECS, WIFI_HEAP_SIZE, WIFI_SSID, lamp_endpoints,
};
use esp_wiz_dimmer::hal::{
    EncoderPins, GpioButton, NetworkMonitor, PcntEncoder, TimerWatchdog, UdpBuffers, UdpTransport,
};
use esp_wiz_dimmer::tasks::{connection_task, control_task, dhcp_task, net_task};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

// 'static Ressourcen (PCNT hält Referenzen auf Unit und Pins)
static PCNT: StaticCell<Pcnt<'static>> = StaticCell::new();
static ENCODER_PINS: StaticCell<EncoderPins> = StaticCell::new();
static UDP_BUFFERS: StaticCell<UdpBuffers<UDP_BUFFER_SIZE, UDP_METADATA_COUNT>> =
    StaticCell::new();

/// Main Entry Point
///
/// Initialisiert Encoder, Taster, WiFi und Watchdog, spawnt dann die Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("=================================");
    info!("  ESP32-C6 WiZ Dimmer");
    info!("=================================");

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Drehencoder: PCNT Unit 0, Quadratur auf A/B mit internen Pull-Ups
    info!("Setup: Encoder...");
    let encoder_cfg = InputConfig::default().with_pull(Pull::Up);
    let encoder_pins = ENCODER_PINS.init(EncoderPins {
        a: Input::new(peripherals.GPIO4, encoder_cfg),
        b: Input::new(peripherals.GPIO5, encoder_cfg),
    });
    let pcnt: &'static Pcnt<'static> = PCNT.init(Pcnt::new(peripherals.PCNT));
    let encoder = PcntEncoder::new(
        &pcnt.unit0,
        encoder_pins,
        ENCODER_FILTER_CYCLES,
        ENCODER_COUNTS_PER_DETENT,
    );
    info!(
        "   Encoder OK (A=GPIO{}, B=GPIO{}, {} counts/detent)",
        ENCODER_A_GPIO_PIN, ENCODER_B_GPIO_PIN, ENCODER_COUNTS_PER_DETENT
    );

    // Taster: Encoder-SW aktiv LOW, Lampen-Taster aktiv HIGH (externer Pull-Down)
    info!("Setup: Buttons...");
    let inputs = [
        ControlInput::new(
            Control::Encoder,
            GpioButton::active_low(peripherals.GPIO6),
            ENCODER_BUTTON,
        ),
        ControlInput::new(
            Control::Lamp(0),
            GpioButton::active_high(peripherals.GPIO2),
            LAMP_BUTTON,
        ),
        ControlInput::new(
            Control::Lamp(1),
            GpioButton::active_high(peripherals.GPIO3),
            LAMP_BUTTON,
        ),
    ];
    info!(
        "   Buttons OK (Encoder=GPIO{}, A=GPIO{}, B=GPIO{})",
        ENCODER_SW_GPIO_PIN, BUTTON_A_GPIO_PIN, BUTTON_B_GPIO_PIN
    );

    // Lampen-Adressen aus der Build-Konfiguration
    let endpoints = lamp_endpoints().expect("Invalid WIZ_LAMP_*_IP in .env");
    for endpoint in &endpoints {
        info!("   Lamp: {}", endpoint);
    }

    // WiFi Hardware initialisieren
    info!("Setup: WiFi '{}'...", WIFI_SSID);
    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Netzwerk-Stack erstellen
    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Static resources für embassy-net
    // 3 Sockets: DHCP (1) + UDP zu den Lampen (1) + Reserve
    static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // UDP Socket für WiZ-Kommandos (Antworten werden gelesen und verworfen)
    let udp_buffers = UDP_BUFFERS.init_with(UdpBuffers::new);
    let transport = UdpTransport::bind(stack, udp_buffers, UDP_LOCAL_PORT)
        .expect("Failed to bind UDP socket");

    // Spawn WiFi Tasks (Reconnect passiert im connection_task)
    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    // Watchdog zuletzt scharf schalten, ab jetzt füttert die Hauptschleife
    let timg1 = TimerGroup::new(peripherals.TIMG1);
    let watchdog = TimerWatchdog::start(timg1.wdt, WATCHDOG_TIMEOUT_SECS);

    let dispatcher = Dispatcher::new(endpoints, CommandSender::new(transport));
    let control = ControlLoop::new(
        LOOP_CONFIG,
        encoder,
        inputs,
        dispatcher,
        NetworkMonitor::new(stack),
        watchdog,
        Instant::now().as_millis(),
    );
    info!("Setup complete - ready");

    spawner.spawn(control_task(control)).unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
