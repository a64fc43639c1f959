//! Logging-Makros für esp-core
//!
//! Mit Feature `defmt` werden die Aufrufe an defmt weitergereicht (Firmware).
//! Ohne Feature (Host-Tests) verschwinden sie, die Argumente werden nur
//! referenziert damit keine "unused" Warnungen entstehen.

#![allow(unused_macros)]

macro_rules! info {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        discard!($($arg)*);
    };
}

macro_rules! warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        discard!($($arg)*);
    };
}

macro_rules! error {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        discard!($($arg)*);
    };
}

macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        discard!($($arg)*);
    };
}

macro_rules! discard {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        { $( let _ = &$arg; )* }
    };
}
